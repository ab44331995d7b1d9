//! Demo configuration: built-in defaults plus a few environment overrides.
use std::path::{Path, PathBuf};

use crate::logging::LoggingConfig;

pub const ENV_RES_DIR: &str = "PATROL_GL_RES_DIR";
pub const ENV_GAME_LIB: &str = "PATROL_GL_GAME_LIB";
pub const ENV_VSYNC: &str = "PATROL_GL_VSYNC";
pub const ENV_LOG: &str = "PATROL_GL_LOG";

/// Base name of the hot-reloadable library, without platform prefix/suffix.
pub const GAME_LIB_NAME: &str = "game";

const START_WIDTH: u32 = 800;
const START_HEIGHT: u32 = 600;

const OPENGL_MAJOR_VER: u8 = 4;
const OPENGL_MINOR_VER: u8 = 1;

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub gl_major: u8,
    pub gl_minor: u8,
    pub vsync: bool,
}

impl WindowConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            width: START_WIDTH,
            height: START_HEIGHT,
            gl_major: OPENGL_MAJOR_VER,
            gl_minor: OPENGL_MINOR_VER,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub window: WindowConfig,
    /// Root of `shaders/` and `textures/`.
    pub res_dir: PathBuf,
    pub game_lib: PathBuf,
    pub logging: LoggingConfig,
}

impl DemoConfig {
    /// Defaults for a demo titled `title`, without looking at the environment.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            window: WindowConfig::new(title),
            res_dir: default_res_dir(),
            game_lib: default_game_lib(),
            logging: LoggingConfig::default(),
        }
    }

    /// Defaults overridden by the process environment.
    pub fn from_env(title: impl Into<String>) -> Self {
        Self::from_lookup(title, |key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `PATROL_GL_*` keys.
    pub fn from_lookup(
        title: impl Into<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut config = Self::new(title);
        if let Some(dir) = lookup(ENV_RES_DIR).filter(|v| !v.is_empty()) {
            config.res_dir = PathBuf::from(dir);
        }
        if let Some(lib) = lookup(ENV_GAME_LIB).filter(|v| !v.is_empty()) {
            config.game_lib = PathBuf::from(lib);
        }
        if let Some(vsync) = lookup(ENV_VSYNC) {
            match parse_flag(&vsync) {
                Some(on) => config.window.vsync = on,
                None => log::warn!("ignoring {ENV_VSYNC}={vsync:?}, expected 0/1/true/false"),
            }
        }
        if let Some(filter) = lookup(ENV_LOG).filter(|v| !v.is_empty()) {
            config.logging.env_filter = Some(filter);
        }
        config
    }

    pub fn shader_path(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.res_dir.join("shaders").join(file_name)
    }

    pub fn texture_path(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.res_dir.join("textures").join(file_name)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

fn default_res_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/res"))
}

/// The game library is built into the same target directory as the demos.
fn default_game_lib() -> PathBuf {
    let file_name = libloading::library_filename(GAME_LIB_NAME);
    match std::env::current_exe() {
        Ok(exe) => exe
            .parent()
            .map(|dir| dir.join(&file_name))
            .unwrap_or_else(|| PathBuf::from(&file_name)),
        Err(_) => PathBuf::from(file_name),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let config = DemoConfig::from_lookup("demo", lookup_from(&[]));
        assert_eq!(config.window.title, "demo");
        assert_eq!((config.window.width, config.window.height), (800, 600));
        assert_eq!((config.window.gl_major, config.window.gl_minor), (4, 1));
        assert!(config.window.vsync);
        assert!(config.res_dir.ends_with("res"));
        assert_eq!(
            config.game_lib.file_name(),
            Some(libloading::library_filename(GAME_LIB_NAME).as_os_str())
        );
        assert!(config.logging.env_filter.is_none());
    }

    #[test]
    fn environment_overrides() {
        let config = DemoConfig::from_lookup(
            "demo",
            lookup_from(&[
                (ENV_RES_DIR, "/tmp/assets"),
                (ENV_GAME_LIB, "/tmp/libgame.so"),
                (ENV_VSYNC, "off"),
                (ENV_LOG, "debug"),
            ]),
        );
        assert_eq!(config.res_dir, PathBuf::from("/tmp/assets"));
        assert_eq!(config.game_lib, PathBuf::from("/tmp/libgame.so"));
        assert!(!config.window.vsync);
        assert_eq!(config.logging.env_filter.as_deref(), Some("debug"));
        assert_eq!(
            config.shader_path("1.vert"),
            PathBuf::from("/tmp/assets/shaders/1.vert")
        );
        assert_eq!(
            config.texture_path("checker.png"),
            PathBuf::from("/tmp/assets/textures/checker.png")
        );
    }

    #[test]
    fn bad_vsync_value_keeps_default() {
        let config = DemoConfig::from_lookup("demo", lookup_from(&[(ENV_VSYNC, "maybe")]));
        assert!(config.window.vsync);
    }

    #[test]
    fn empty_values_are_ignored() {
        let config = DemoConfig::from_lookup(
            "demo",
            lookup_from(&[(ENV_RES_DIR, ""), (ENV_LOG, "")]),
        );
        assert!(config.res_dir.ends_with("res"));
        assert!(config.logging.env_filter.is_none());
    }

    #[test]
    fn flag_parsing() {
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag(""), None);
    }
}
