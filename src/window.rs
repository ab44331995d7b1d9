//! SDL2 window with an OpenGL core context, plus per-frame bookkeeping.
use std::time::{Duration, Instant};

use sdl2::{event::Event, keyboard::Keycode, video};

use crate::{
    config::WindowConfig,
    gl_wrappers::{gl_max_vertex_attribs, gl_upd_viewport, gl_version},
};

/// Everything SDL hands out that has to outlive the frame loop.
pub struct GlWindow {
    // the context must be dropped before the window it belongs to
    _gl_ctx: video::GLContext,
    window: video::Window,
    _video_ctx: sdl2::VideoSubsystem,
    event_pump: sdl2::EventPump,
    _sdl_ctx: sdl2::Sdl,
    main_id: u32,
    started: Instant,
}

impl GlWindow {
    /// Open the window, create a current GL context and load the GL functions.
    pub fn open(config: &WindowConfig) -> Result<Self, String> {
        let sdl_ctx = sdl2::init()?;

        let video_ctx = sdl_ctx.video()?;
        video_ctx.gl_load_library_default()?;

        let gl_attr = video_ctx.gl_attr();
        gl_attr.set_context_flags().forward_compatible().set();
        gl_attr.set_context_major_version(config.gl_major);
        gl_attr.set_context_minor_version(config.gl_minor);
        gl_attr.set_context_profile(video::GLProfile::Core);

        let window = video_ctx
            .window(&config.title, config.width, config.height)
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| format!("Error creating window: {e}"))?;

        let gl_ctx = window.gl_create_context()?;
        window.gl_make_current(&gl_ctx)?;
        gl::load_with(|s| video_ctx.gl_get_proc_address(s).cast());

        let interval = if config.vsync {
            video::SwapInterval::VSync
        } else {
            video::SwapInterval::Immediate
        };
        if let Err(err) = video_ctx.gl_set_swap_interval(interval) {
            log::warn!("could not set swap interval: {err}");
        }

        gl_upd_viewport(config.width, config.height);

        log::info!("OpenGL Version: {}", gl_version());
        log::info!(
            "Maximum nr of vertex attributes supported: {}",
            gl_max_vertex_attribs()
        );

        let event_pump = sdl_ctx.event_pump()?;
        let main_id = window.id();
        Ok(Self {
            _gl_ctx: gl_ctx,
            window,
            _video_ctx: video_ctx,
            event_pump,
            _sdl_ctx: sdl_ctx,
            main_id,
            started: Instant::now(),
        })
    }

    /// Drain pending events. Returns `false` once the window should close.
    pub fn pump_events(&mut self) -> bool {
        let mut keep_going = true;
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::ESCAPE),
                    ..
                } => {
                    keep_going = false;
                }
                Event::Window {
                    window_id,
                    win_event: sdl2::event::WindowEvent::Close,
                    ..
                } if window_id == self.main_id => {
                    keep_going = false;
                }
                _ => {}
            }
        }
        keep_going
    }

    pub fn swap(&self) {
        self.window.gl_swap_window();
    }

    /// Seconds since the window was opened.
    pub fn time(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }
}

/// Collects frame times and reports the average once per `interval`.
#[derive(Debug)]
pub struct FrameStats {
    frametimes: Vec<f64>,
    last_report: Instant,
    interval: Duration,
}

/// Average frame time over a report interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub avg_frametime: f64,
    pub fps: f64,
    pub frames: usize,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Instant::now())
    }
}

impl FrameStats {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            frametimes: Vec::with_capacity(256),
            last_report: now,
            interval,
        }
    }

    /// Record one frame that took `frametime`, finishing at `now`.
    pub fn record(&mut self, frametime: Duration, now: Instant) -> Option<FrameReport> {
        self.frametimes.push(frametime.as_secs_f64());
        if now.duration_since(self.last_report) < self.interval {
            return None;
        }
        // can't reduce since we're keeping this Vec around
        let total_time = self.frametimes.iter().sum::<f64>();
        let frames = self.frametimes.len();
        let avg_frametime = total_time / frames as f64;
        self.frametimes.clear();
        self.last_report = now;
        Some(FrameReport {
            avg_frametime,
            fps: if avg_frametime > 0.0 {
                1. / avg_frametime
            } else {
                f64::INFINITY
            },
            frames,
        })
    }

    /// [`record`](Self::record) and log the report, if any.
    pub fn tick(&mut self, frame_start: Instant) {
        let now = Instant::now();
        if let Some(report) = self.record(now.duration_since(frame_start), now) {
            log::debug!(
                "frametime: {:0.8}, FPS: {:0.2}, frames counted: {:05}",
                report.avg_frametime,
                report.fps,
                report.frames
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_interval() {
        let start = Instant::now();
        let mut stats = FrameStats::new(Duration::from_secs(1), start);
        let frame = Duration::from_millis(10);

        for i in 1..100 {
            assert_eq!(stats.record(frame, start + frame * i), None);
        }
        let report = stats.record(frame, start + Duration::from_secs(1)).unwrap();
        assert_eq!(report.frames, 100);
        assert!((report.avg_frametime - 0.01).abs() < 1e-9);
        assert!((report.fps - 100.0).abs() < 1e-6);

        // the window restarts after a report
        assert_eq!(
            stats.record(frame, start + Duration::from_millis(1500)),
            None
        );
    }

    #[test]
    fn zero_length_frames_do_not_divide_by_zero() {
        let start = Instant::now();
        let mut stats = FrameStats::new(Duration::ZERO, start);
        let report = stats.record(Duration::ZERO, start).unwrap();
        assert_eq!(report.frames, 1);
        assert!(report.fps.is_infinite());
    }
}
