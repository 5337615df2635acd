//! Orrery application framework.
//!
//! Provides window creation, event handling, and the main application loop.

pub mod game_loop;
pub mod renderer;
pub mod window;

pub use window::{AppError, run};
