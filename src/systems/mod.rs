//! Application systems
//!
//! Window, rendering and frame simulation, kept out of main.rs so they can
//! be tested on their own.

mod render;
mod simulation;
mod window;

pub use render::{RenderError, RenderSystem};
pub use simulation::{SimulationResult, SimulationSystem, MAX_FRAME_DT};
pub use window::{window_title, WindowError, WindowSystem};
