//! bounce2d - labeled circles loaded from CSV
//!
//! Usage: `bounce2d [FILE]`. Drop a CSV file onto the window to load it,
//! drag circles with the mouse or a finger. `R` reloads, `Tab` switches the
//! dynamics strategy, `Escape` quits.

use std::path::PathBuf;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use bounce2d::config::AppConfig;
use bounce2d::input::{InputAction, InputMapper};
use bounce2d::systems::{RenderError, RenderSystem, SimulationSystem, WindowSystem};
use bounce2d_core::{InputEvent, SimulationState, Viewport};
use bounce2d_input::{PointerEvent, PointerTracker};

/// Main application state
struct App {
    config: AppConfig,
    /// File to load once the window exists
    initial_file: Option<PathBuf>,
    window: Option<WindowSystem>,
    render: Option<RenderSystem>,
    simulation: SimulationSystem,
    state: SimulationState,
    pointer: PointerTracker,
}

impl App {
    fn new(config: AppConfig, initial_file: Option<PathBuf>) -> Self {
        let viewport = Viewport::new(config.window.width as f32, config.window.height as f32);
        let state = SimulationState::new(viewport, config.simulation.dynamics, config.dynamics_settings());
        let simulation = SimulationSystem::new(config.loader.row_policy);

        Self {
            config,
            initial_file,
            window: None,
            render: None,
            simulation,
            state,
            pointer: PointerTracker::new(),
        }
    }

    fn update_title(&self) {
        if let Some(window) = &self.window {
            window.update_title(self.state.dynamics_kind(), self.simulation.current_file());
        }
    }

    fn handle_pointer(&mut self, event: Option<PointerEvent>) {
        if let Some(event) = event {
            self.state.handle(InputMapper::map_pointer(event));
        }
    }

    fn handle_action(&mut self, action: InputAction, event_loop: &ActiveEventLoop) {
        match action {
            InputAction::Reload => {
                self.simulation.reload();
            }
            InputAction::CycleDynamics => {
                self.state.cycle_dynamics();
                self.update_title();
            }
            InputAction::Exit => event_loop.exit(),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let result = self.simulation.update(&mut self.state);
        if result.loaded.is_some() {
            self.update_title();
        }

        if let Some(render) = &mut self.render {
            match render.render_frame(&self.state) {
                Ok(()) => {}
                Err(RenderError::SurfaceLost) => log::debug!("Surface lost, reconfigured"),
                Err(RenderError::OutOfMemory) => {
                    log::error!("GPU out of memory");
                    event_loop.exit();
                    return;
                }
                Err(e) => log::warn!("{}", e),
            }
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let render = match RenderSystem::new(window.window().clone(), &self.config.rendering, self.config.window.vsync) {
            Ok(render) => render,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let viewport = window.viewport();
        if viewport.width > 0.0 && viewport.height > 0.0 {
            self.state.handle(InputEvent::Resize(viewport));
        }
        if let Some(path) = self.initial_file.take() {
            self.simulation.load(path);
        }

        self.window = Some(window);
        self.render = Some(render);
        self.update_title();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(render) = &mut self.render {
                    render.resize(size.width, size.height);
                }
                if size.width > 0 && size.height > 0 {
                    self.state
                        .handle(InputEvent::Resize(Viewport::new(size.width as f32, size.height as f32)));
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self.pointer.process_cursor_moved(position.x, position.y);
                self.handle_pointer(event);
            }

            WindowEvent::CursorLeft { .. } => {
                let event = self.pointer.process_cursor_left();
                self.handle_pointer(event);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.pointer.process_mouse_button(button, state);
                self.handle_pointer(event);
            }

            WindowEvent::Touch(touch) => {
                let event = self
                    .pointer
                    .process_touch(touch.id, touch.phase, touch.location.x, touch.location.y);
                self.handle_pointer(event);
            }

            WindowEvent::DroppedFile(path) => {
                self.simulation.load(path);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if let Some(action) = InputMapper::map_keyboard(key, event.state, event.repeat) {
                        self.handle_action(action, event_loop);
                    }
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Config first, so the log level can come from it
    let loaded = AppConfig::load();
    let log_level = loaded
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    let initial_file = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.loader.initial_file.clone());

    log::info!("Starting bounce2d ({} dynamics)", config.simulation.dynamics.name());

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, initial_file);
    event_loop.run_app(&mut app)?;
    Ok(())
}
