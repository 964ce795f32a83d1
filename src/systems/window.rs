//! Window management system
//!
//! Handles window creation and title updates.

use std::path::Path;
use std::sync::Arc;
use winit::{event_loop::ActiveEventLoop, window::Window};

use bounce2d_core::{DynamicsKind, Viewport};

use crate::config::WindowConfig;

/// Title showing the active strategy and the loaded file
pub fn window_title(base: &str, dynamics: DynamicsKind, file: Option<&Path>) -> String {
    match file.and_then(|f| f.file_name()) {
        Some(name) => format!("{} - {} [{}]", base, name.to_string_lossy(), dynamics.name()),
        None => format!("{} - drop a CSV file [{}]", base, dynamics.name()),
    }
}

/// Manages the application window
pub struct WindowSystem {
    window: Arc<Window>,
    base_title: String,
}

impl WindowSystem {
    /// Create window from config
    pub fn create(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self, WindowError> {
        let attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| WindowError::CreationFailed(e.to_string()))?,
        );

        Ok(Self {
            window,
            base_title: config.title.clone(),
        })
    }

    /// Get window reference (for RenderContext creation)
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Drawable area in physical pixels
    pub fn viewport(&self) -> Viewport {
        let size = self.window.inner_size();
        Viewport::new(size.width as f32, size.height as f32)
    }

    /// Update window title with strategy/file info
    pub fn update_title(&self, dynamics: DynamicsKind, file: Option<&Path>) {
        self.window.set_title(&window_title(&self.base_title, dynamics, file));
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}
