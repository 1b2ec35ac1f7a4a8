//! Window and event loop.
//!
//! Input events are translated into [`Command`]s and queued; each redraw runs
//! one simulation tick over the queue, then draws the result.

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::gpu::{line_vertices, GpuState};
use crate::input::{Command, Input};
use crate::picking::Viewport;
use crate::simulation::Simulation;
use crate::time::FrameClock;

/// Open a window and run the viewer until it is closed.
pub fn run(config: ViewerConfig) -> Result<(), ViewerError> {
    let simulation = Simulation::try_new(&config)?;
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, simulation);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    simulation: Simulation,
    input: Input,
    clock: FrameClock,
    pending: Vec<Command>,
    /// Setup failure surfaced from inside the event loop.
    error: Option<ViewerError>,
}

impl App {
    fn new(config: ViewerConfig, simulation: Simulation) -> Self {
        let clock = FrameClock::new(config.target_fps);
        Self {
            config,
            window: None,
            gpu_state: None,
            simulation,
            input: Input::new(),
            clock,
            pending: Vec::new(),
            error: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(self.config.width, self.config.height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();
        self.simulation
            .set_viewport(Viewport::from_size(size.width, size.height));

        let gpu_state = pollster::block_on(GpuState::new(window.clone()))?;
        tracing::info!(width = size.width, height = size.height, "window created");

        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.clock.tick();
        let report = self.simulation.tick(self.pending.drain(..));
        if report.rejected > 0 {
            tracing::debug!(rejected = report.rejected, "trajectories held in place");
        }

        if let Some(gpu_state) = &mut self.gpu_state {
            let vertices = line_vertices(
                self.simulation.trajectories(),
                self.simulation.params().max_radius,
            );
            match gpu_state.render(self.simulation.view_projection(), &vertices) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    tracing::warn!("surface lost, reconfiguring");
                    gpu_state.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    tracing::error!("GPU out of memory");
                    event_loop.exit();
                }
                Err(e) => tracing::error!("render error: {e:?}"),
            }
        }

        if let Some(window) = &self.window {
            window.set_title(&format!(
                "{} | {} | {:.0} fps",
                self.config.title,
                self.simulation.status_line(),
                self.clock.fps()
            ));
        }

        if report.quit {
            tracing::info!(ticks = self.simulation.tick_count(), "quit requested");
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.create_window(event_loop) {
            tracing::error!("{err}");
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(*physical_size);
                }
                self.simulation
                    .set_viewport(Viewport::from_size(physical_size.width, physical_size.height));
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                return;
            }
            _ => {}
        }

        if let Some(command) = self.input.handle_event(&event) {
            tracing::trace!(?command, "input");
            self.pending.push(command);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.clock.is_due(Instant::now()) {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.clock.next_deadline()));
    }
}
