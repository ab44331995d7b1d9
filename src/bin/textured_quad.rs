//! A static quad blending two textures.
use std::{rc::Rc, time::Instant};

use anyhow::{anyhow, Context, Result};
use patrol_gl::{
    gl_clear, gl_wrappers::Program, load_game_code, logging::init_logging, DemoConfig,
    FrameStats, GlWindow, Quad, Vertex,
};

fn main() -> Result<()> {
    let config = DemoConfig::from_env("OpenGL 4.1 Textured Quad");
    init_logging(&config.logging);

    let mut window = GlWindow::open(&config.window)
        .map_err(|e| anyhow!(e))
        .context("failed to set up the window")?;

    let shader = Rc::new(
        Program::from_files(
            config.shader_path("textured.vert"),
            config.shader_path("textured.frag"),
        )
        .context("failed to load the texture shader")?,
    );

    let mut quad = Quad::new(
        vec![
            Vertex::new([0.5, 0.5, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0]),   // top right
            Vertex::new([0.5, -0.5, 0.0], [1.0, 1.0, 0.8], [2.0, 0.0]),  // bottom right
            Vertex::new([-0.5, -0.5, 0.0], [0.8, 1.0, 1.0], [0.0, 0.0]), // bottom left
            Vertex::new([-0.5, 0.5, 0.0], [1.0, 0.8, 1.0], [0.0, 2.0]),  // top left
        ],
        vec![0, 1, 3, 1, 2, 3],
        shader,
    )?;
    quad.upload_vertices();
    quad.upload_texture(config.texture_path("checker.png"));
    quad.upload_texture(config.texture_path("stripes.png"));
    if quad.texture_count() < 2 {
        log::warn!("only {} of 2 textures loaded", quad.texture_count());
    }

    let mut game = load_game_code(&config).context("failed to load the game code")?;
    let mut clear_color = [0.2, 0.3, 0.3, 1.0];
    let mut stats = FrameStats::default();

    while window.pump_events() {
        let frame_start = Instant::now();

        game.poll();
        game.code().clear_color(&mut clear_color);
        gl_clear(clear_color);

        quad.draw();

        window.swap();
        stats.tick(frame_start);
    }

    Ok(())
}
