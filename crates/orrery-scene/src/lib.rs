//! Solar-system scene simulation: sun, orbiting planet, orbiting moon.
//!
//! This crate is pure state and math. Bodies advance by one fixed tick at a
//! time and the scene emits a flat draw list of model transforms; GPU
//! concerns live entirely in `orrery-render`.

mod body;
mod moon;
mod planet;
mod scene;
mod sun;

pub use body::{CelestialBody, SphereDetail, TextureSlot, TickContext, wrap_degrees};
pub use moon::Moon;
pub use planet::{MAX_ZOOM, MIN_ZOOM, Planet};
pub use scene::{BodyDraw, Scene};
pub use sun::Sun;
