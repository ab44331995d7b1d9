//! A textured quad walking the patrol square; the texture turns with it.
use std::{rc::Rc, time::Instant};

use anyhow::{anyhow, Context, Result};
use patrol_gl::{
    gl_clear, gl_wrappers::Program, hot_reload::ReloadOutcome, load_game_code,
    logging::init_logging, DemoConfig, Direction, FrameStats, GlWindow, Patrol, Quad, Vertex,
};

const HALF_SIZE: f32 = 0.15;

fn main() -> Result<()> {
    let config = DemoConfig::from_env("OpenGL 4.1 Patrol Quad");
    init_logging(&config.logging);

    let mut window = GlWindow::open(&config.window)
        .map_err(|e| anyhow!(e))
        .context("failed to set up the window")?;

    let shader = Rc::new(
        Program::from_files(
            config.shader_path("textured.vert"),
            config.shader_path("patrol.frag"),
        )
        .context("failed to load the patrol shader")?,
    );

    let (cx, cy) = (-0.7, 0.75);
    let mut quad = Quad::dynamic(
        vec![
            Vertex::new([cx + HALF_SIZE, cy + HALF_SIZE, 0.0], [1.0, 1.0, 1.0], [1.0, 1.0]),
            Vertex::new([cx + HALF_SIZE, cy - HALF_SIZE, 0.0], [1.0, 0.9, 0.9], [1.0, 0.0]),
            Vertex::new([cx - HALF_SIZE, cy - HALF_SIZE, 0.0], [0.9, 1.0, 0.9], [0.0, 0.0]),
            Vertex::new([cx - HALF_SIZE, cy + HALF_SIZE, 0.0], [0.9, 0.9, 1.0], [0.0, 1.0]),
        ],
        vec![0, 1, 3, 1, 2, 3],
        Rc::clone(&shader),
    )?;
    quad.upload_vertices();
    quad.upload_texture(config.texture_path("checker.png"));
    let mut patrol = Patrol::with_defaults(quad.vertices())?;

    let mut game = load_game_code(&config).context("failed to load the game code")?;
    let mut clear_color = [0.1, 0.1, 0.15, 1.0];
    let mut stats = FrameStats::default();

    while window.pump_events() {
        let frame_start = Instant::now();

        if let ReloadOutcome::Reloaded { generation } = game.poll() {
            log::info!(
                "clear color now comes from {} (generation {generation})",
                game.path().display()
            );
        }
        game.code().clear_color(&mut clear_color);
        gl_clear(clear_color);

        if let Some(direction) = patrol.advance(quad.vertices_mut()) {
            log::debug!("quad now heading {direction:?}");
        }
        shader.set_bool(
            "vertical",
            matches!(patrol.direction(), Direction::Down | Direction::Up),
        );
        quad.draw();

        window.swap();
        stats.tick(frame_start);
    }

    Ok(())
}
