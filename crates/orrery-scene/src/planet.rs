//! The planet: orbits the world origin, spins passively, and carries the
//! user-driven view rotation and zoom.

use std::time::Duration;

use glam::Vec3;

use crate::body::{CelestialBody, TickContext, wrap_degrees};
use crate::moon::Moon;

/// Closest allowed camera distance.
pub const MIN_ZOOM: f32 = 2.1;
/// Farthest allowed camera distance.
pub const MAX_ZOOM: f32 = 20.0;

/// Degrees of passive self-rotation per tick.
const PASSIVE_ROTATION_STEP: f32 = 0.1;
/// Degrees the user X-rotation returns toward rest per tick once idle.
const RETURN_STEP: f32 = 0.5;
/// Idle time after which the user X-rotation starts returning to rest.
const RETURN_DELAY: Duration = Duration::from_millis(2000);
/// Limit on the user X-rotation, preventing the view from flipping.
const USER_X_LIMIT: f32 = 40.0;

/// A planet on a circular orbit around the world origin.
///
/// Owns its moon; the moon's update cascades from the planet's. The world
/// position is derived from the orbit angle on every tick and is never set
/// directly.
#[derive(Debug, Clone)]
pub struct Planet {
    radius: f32,
    atmosphere_radius: f32,
    rotation_y: f32,
    user_rotation_x: f32,
    user_rotation_y: f32,
    zoom: f32,
    orbit_radius: f32,
    orbit_angle: f32,
    orbit_speed: f32,
    position: Vec3,
    moon: Moon,
}

impl Planet {
    /// Create a planet with the given radii and orbit parameters, starting
    /// at orbit angle 0 (position `(orbit_radius, 0, 0)`).
    pub fn new(
        radius: f32,
        atmosphere_radius: f32,
        moon: Moon,
        orbit_radius: f32,
        orbit_speed: f32,
    ) -> Self {
        Self {
            radius,
            atmosphere_radius,
            rotation_y: 0.0,
            user_rotation_x: 0.0,
            user_rotation_y: 0.0,
            zoom: 5.0,
            orbit_radius,
            orbit_angle: 0.0,
            orbit_speed,
            position: Vec3::new(orbit_radius, 0.0, 0.0),
            moon,
        }
    }

    /// Set the user view rotation. X is clamped to the flip limit; Y is
    /// unbounded.
    pub fn set_user_rotation(&mut self, x: f32, y: f32) {
        self.user_rotation_x = x.clamp(-USER_X_LIMIT, USER_X_LIMIT);
        self.user_rotation_y = y;
    }

    /// Set the camera distance, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Current camera distance.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Current world position, consistent with the orbit angle.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Passive self-rotation angle in degrees, `[0, 360)`.
    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    /// Orbit angle in degrees, `[0, 360)`.
    pub fn orbit_angle(&self) -> f32 {
        self.orbit_angle
    }

    /// User-driven rotation `(x, y)` in degrees.
    pub fn user_rotation(&self) -> (f32, f32) {
        (self.user_rotation_x, self.user_rotation_y)
    }

    /// Body sphere radius.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Atmosphere sphere radius.
    pub fn atmosphere_radius(&self) -> f32 {
        self.atmosphere_radius
    }

    /// The owned moon.
    pub fn moon(&self) -> &Moon {
        &self.moon
    }

    /// Step the user X-rotation toward rest, snapping to exactly zero once
    /// within one step. The snap prevents oscillation around zero.
    fn return_user_rotation(&mut self) {
        if self.user_rotation_x > 0.0 {
            self.user_rotation_x -= RETURN_STEP;
        } else if self.user_rotation_x < 0.0 {
            self.user_rotation_x += RETURN_STEP;
        }
        if self.user_rotation_x.abs() < RETURN_STEP {
            self.user_rotation_x = 0.0;
        }
    }
}

impl CelestialBody for Planet {
    fn update(&mut self, ctx: &TickContext) {
        self.rotation_y = wrap_degrees(self.rotation_y + PASSIVE_ROTATION_STEP);

        self.orbit_angle = wrap_degrees(self.orbit_angle + self.orbit_speed);
        let theta = self.orbit_angle.to_radians();
        self.position = Vec3::new(
            self.orbit_radius * theta.cos(),
            0.0,
            self.orbit_radius * theta.sin(),
        );

        if ctx.idle >= RETURN_DELAY && self.user_rotation_x != 0.0 {
            self.return_user_rotation();
        }

        self.moon.update(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planet() -> Planet {
        Planet::new(1.0, 1.05, Moon::new(5.0, 0.27), 20.0, 0.1)
    }

    fn active() -> TickContext {
        TickContext {
            idle: Duration::ZERO,
        }
    }

    fn idle() -> TickContext {
        TickContext {
            idle: Duration::from_millis(2000),
        }
    }

    #[test]
    fn test_passive_rotation_wraps() {
        let mut p = planet();
        for _ in 0..40_000 {
            p.update(&active());
            let r = p.rotation_y();
            assert!((0.0..360.0).contains(&r), "rotation out of range: {r}");
        }
    }

    #[test]
    fn test_position_on_orbit_circle() {
        let mut p = planet();
        for _ in 0..1000 {
            p.update(&active());
            let pos = p.position();
            let r2 = pos.x * pos.x + pos.z * pos.z;
            assert!(
                (r2 - 400.0).abs() < 1e-2,
                "position off the orbit circle: r^2 = {r2}"
            );
            assert_eq!(pos.y, 0.0);
        }
    }

    #[test]
    fn test_orbit_returns_after_3600_ticks() {
        let mut p = planet();
        let start = p.orbit_angle();
        // 3600 ticks at 0.1 degrees per tick = one revolution.
        for _ in 0..3600 {
            p.update(&active());
        }
        assert!((p.orbit_angle() - start).abs() < 1e-2);
    }

    #[test]
    fn test_user_x_clamped_by_setter() {
        let mut p = planet();
        p.set_user_rotation(90.0, 123.0);
        assert_eq!(p.user_rotation(), (40.0, 123.0));
        p.set_user_rotation(-90.0, -500.0);
        assert_eq!(p.user_rotation(), (-40.0, -500.0));
    }

    #[test]
    fn test_zoom_clamped_by_setter() {
        let mut p = planet();
        p.set_zoom(1.0);
        assert_eq!(p.zoom(), MIN_ZOOM);
        p.set_zoom(100.0);
        assert_eq!(p.zoom(), MAX_ZOOM);
        p.set_zoom(5.0);
        assert_eq!(p.zoom(), 5.0);
    }

    #[test]
    fn test_idle_return_monotonic_and_snaps() {
        let mut p = planet();
        p.set_user_rotation(10.0, 0.0);

        let mut prev = 10.0;
        loop {
            p.update(&idle());
            let (x, _) = p.user_rotation();
            assert!(x <= prev, "return must be monotonic: {x} > {prev}");
            assert!(x >= 0.0, "return must not overshoot past zero: {x}");
            if x == 0.0 {
                break;
            }
            prev = x;
        }
        // Stays at rest once reached.
        p.update(&idle());
        assert_eq!(p.user_rotation().0, 0.0);
    }

    #[test]
    fn test_idle_return_from_negative() {
        let mut p = planet();
        p.set_user_rotation(-3.2, 0.0);
        for _ in 0..20 {
            p.update(&idle());
        }
        assert_eq!(p.user_rotation().0, 0.0);
    }

    #[test]
    fn test_no_return_while_active() {
        let mut p = planet();
        p.set_user_rotation(10.0, 0.0);
        for _ in 0..100 {
            p.update(&active());
        }
        assert_eq!(p.user_rotation().0, 10.0);
    }

    #[test]
    fn test_return_step_size() {
        let mut p = planet();
        p.set_user_rotation(10.0, 0.0);
        p.update(&idle());
        assert!((p.user_rotation().0 - 9.5).abs() < 1e-6);
    }

    #[test]
    fn test_moon_cascades_from_planet_update() {
        let mut p = planet();
        p.update(&active());
        assert!((p.moon().orbit_angle() - 0.5).abs() < 1e-6);
    }
}
