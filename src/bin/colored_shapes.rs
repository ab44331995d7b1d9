//! A colored quad, two pulsing triangles and one triangle patrolling the
//! screen, over a clear color owned by the hot-reloaded game code.
use std::{rc::Rc, time::Instant};

use anyhow::{anyhow, Context, Result};
use patrol_gl::{
    gl_clear, gl_wrappers::Program, load_game_code, logging::init_logging, DemoConfig,
    FrameStats, GlWindow, Patrol, Quad, Vertex,
};

fn main() -> Result<()> {
    let config = DemoConfig::from_env("OpenGL 4.1 Colored Shapes");
    init_logging(&config.logging);

    let mut window = GlWindow::open(&config.window)
        .map_err(|e| anyhow!(e))
        .context("failed to set up the window")?;

    let shader = Rc::new(
        Program::from_files(config.shader_path("1.vert"), config.shader_path("1.frag"))
            .context("failed to load the first shader")?,
    );
    let second_shader = Rc::new(
        Program::from_files(config.shader_path("2.vert"), config.shader_path("2.frag"))
            .context("failed to load the second shader")?,
    );

    let mut quad = Quad::new(
        vec![
            Vertex::colored([0.5, 0.5, 0.0], [1.0, 0.0, 0.0]),   // top right
            Vertex::colored([0.5, -0.3, 0.0], [0.0, 1.0, 0.0]),  // bottom right
            Vertex::colored([-0.5, -0.3, 0.0], [0.0, 0.0, 1.0]), // bottom left
            Vertex::colored([-0.5, 0.5, 0.0], [0.5, 0.5, 0.0]),  // top left
        ],
        vec![0, 1, 3, 1, 2, 3],
        Rc::clone(&shader),
    )?;
    quad.upload_vertices();

    let mut triangles = Quad::new(
        vec![
            Vertex::colored([-0.7, -0.6, 0.0], [1.0, 0.0, 0.0]),
            Vertex::colored([-0.45, -0.99, 0.0], [0.0, 1.0, 0.0]),
            Vertex::colored([-0.95, -0.99, 0.0], [0.0, 0.0, 1.0]),
            Vertex::colored([0.7, -0.6, 0.0], [0.0, 0.0, 1.0]),
            Vertex::colored([0.45, -0.99, 0.0], [0.0, 1.0, 0.0]),
            Vertex::colored([0.95, -0.99, 0.0], [1.0, 0.0, 0.0]),
        ],
        vec![0, 1, 2, 3, 4, 5],
        Rc::clone(&second_shader),
    )?;
    triangles.upload_vertices();

    // pointing down, in the top left corner
    let mut walker = Quad::dynamic(
        vec![
            Vertex::colored([-0.7, 0.55, 0.0], [1.0, 0.0, 0.0]),
            Vertex::colored([-0.45, 0.99, 0.0], [0.0, 1.0, 0.0]),
            Vertex::colored([-0.95, 0.99, 0.0], [0.0, 0.0, 1.0]),
        ],
        vec![0, 1, 2],
        Rc::clone(&shader),
    )?;
    walker.upload_vertices();
    let mut patrol = Patrol::with_defaults(walker.vertices())?;

    let mut game = load_game_code(&config).context("failed to load the game code")?;
    let mut clear_color = [0.2, 0.3, 0.3, 1.0];
    let mut stats = FrameStats::default();

    while window.pump_events() {
        let frame_start = Instant::now();

        game.poll();
        game.code().clear_color(&mut clear_color);
        gl_clear(clear_color);

        quad.draw();
        second_shader.set_float("greenUniform", window.time().sin());
        triangles.draw();

        if let Some(direction) = patrol.advance(walker.vertices_mut()) {
            log::trace!("triangle now heading {direction:?}");
        }
        walker.draw();

        window.swap();
        stats.tick(frame_start);
    }

    Ok(())
}
