//! Small OpenGL demos: shaders from disk, indexed quads, a square patrol
//! animation and hot-reloaded game code.
pub mod gl_wrappers;
pub mod config;
pub mod error;
pub mod hot_reload;
pub mod logging;
pub mod patrol;
pub mod quad;
pub mod render_vec;
pub mod vertex;
pub mod window;

pub use config::DemoConfig;
pub use error::{GeometryError, ReloadError, ShaderError, TextureError};
pub use gl_wrappers::{gl_clear, gl_upd_viewport};
pub use hot_reload::{DylibLoader, GameCode, HotReload, ReloadOutcome};
pub use patrol::{Direction, Patrol, PatrolBounds};
pub use quad::Quad;
pub use vertex::Vertex;
pub use window::{FrameStats, GlWindow};

/// Hot-reloaded game code as the demos use it.
pub type GameReload = HotReload<DylibLoader>;

/// Load the game library named in `config`; fatal for the demos when it fails.
pub fn load_game_code(config: &DemoConfig) -> Result<GameReload, ReloadError> {
    HotReload::new(&config.game_lib, DylibLoader::default())
}
