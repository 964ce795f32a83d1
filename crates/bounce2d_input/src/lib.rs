//! Pointer input handling
//!
//! This crate turns raw winit mouse and touch input into a single stream of
//! pointer events, so a drag works the same with either.

mod pointer;

pub use pointer::{PointerEvent, PointerTracker};
