//! The sun: stationary at the world origin, doubling as the light source.

use crate::body::{CelestialBody, TickContext};

/// The central star. It never moves, so `update` is a no-op kept for
/// interface uniformity with the other bodies.
#[derive(Debug, Clone)]
pub struct Sun {
    radius: f32,
}

impl Sun {
    /// Create a sun with the given render radius.
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    /// Body sphere radius.
    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl CelestialBody for Sun {
    fn update(&mut self, _ctx: &TickContext) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_update_is_a_no_op() {
        let mut sun = Sun::new(10.0);
        sun.update(&TickContext {
            idle: Duration::from_secs(60),
        });
        assert_eq!(sun.radius(), 10.0);
    }
}
