//! The moon: orbits its parent planet's local frame.

use crate::body::{CelestialBody, TickContext, wrap_degrees};

/// Degrees of orbit advanced per simulation tick.
const ORBIT_STEP: f32 = 0.5;

/// Radius added to the body radius for the atmosphere shell.
pub(crate) const ATMOSPHERE_SHELL: f32 = 0.05;

/// A moon orbiting on a fixed-radius circle around its parent's origin.
///
/// The moon has no independent input; its only time-dependent state is the
/// orbit angle, which wraps modulo 360.
#[derive(Debug, Clone)]
pub struct Moon {
    orbit_angle: f32,
    distance: f32,
    radius: f32,
}

impl Moon {
    /// Create a moon at `distance` from the parent origin with the given
    /// render radius, starting at orbit angle 0.
    pub fn new(distance: f32, radius: f32) -> Self {
        Self {
            orbit_angle: 0.0,
            distance,
            radius,
        }
    }

    /// Current orbit angle in degrees, always in `[0, 360)`.
    pub fn orbit_angle(&self) -> f32 {
        self.orbit_angle
    }

    /// Distance from the parent origin.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Body sphere radius.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Atmosphere sphere radius (slightly larger than the body).
    pub fn atmosphere_radius(&self) -> f32 {
        self.radius + ATMOSPHERE_SHELL
    }
}

impl CelestialBody for Moon {
    fn update(&mut self, _ctx: &TickContext) {
        self.orbit_angle = wrap_degrees(self.orbit_angle + ORBIT_STEP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ctx() -> TickContext {
        TickContext {
            idle: Duration::ZERO,
        }
    }

    #[test]
    fn test_orbit_angle_advances_half_degree() {
        let mut moon = Moon::new(5.0, 0.27);
        moon.update(&ctx());
        assert!((moon.orbit_angle() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_orbit_angle_stays_in_range() {
        let mut moon = Moon::new(5.0, 0.27);
        for _ in 0..10_000 {
            moon.update(&ctx());
            let a = moon.orbit_angle();
            assert!((0.0..360.0).contains(&a), "angle out of range: {a}");
        }
    }

    #[test]
    fn test_full_revolution_returns_to_start() {
        let mut moon = Moon::new(5.0, 0.27);
        // 720 ticks at 0.5 degrees per tick = 360 degrees.
        for _ in 0..720 {
            moon.update(&ctx());
        }
        assert!(moon.orbit_angle().abs() < 1e-3);
    }

    #[test]
    fn test_atmosphere_slightly_larger_than_body() {
        let moon = Moon::new(5.0, 0.27);
        assert!((moon.atmosphere_radius() - 0.32).abs() < 1e-6);
    }
}
