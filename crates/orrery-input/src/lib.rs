//! Mouse input handling: frame-coherent event accumulation and the
//! drag-to-rotate / wheel-to-zoom translation.

mod controls;
mod mouse;

pub use controls::{DragControls, ZOOM_STEP};
pub use mouse::MouseState;
