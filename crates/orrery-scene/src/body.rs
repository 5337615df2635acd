//! Shared body capability and per-tick context.

use std::time::Duration;

/// Per-tick simulation context.
///
/// `idle` is the time elapsed since the last user interaction, measured by
/// the input layer and threaded through the frame loop.
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    /// Time since the last recorded user interaction.
    pub idle: Duration,
}

/// Capability shared by every body in the scene.
///
/// The body set is closed ({Sun, Planet, Moon}); the trait exists so the
/// frame loop can advance each top-level body uniformly, including the sun
/// whose update is a no-op.
pub trait CelestialBody {
    /// Advance time-dependent state by one simulation tick.
    fn update(&mut self, ctx: &TickContext);
}

/// Sphere tessellation level, chosen per body by screen importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SphereDetail {
    /// 40 slices × 40 stacks, for the sun and planet.
    High,
    /// 30 slices × 30 stacks, for the moon.
    Low,
}

impl SphereDetail {
    /// Longitude subdivisions.
    pub fn slices(self) -> u32 {
        match self {
            SphereDetail::High => 40,
            SphereDetail::Low => 30,
        }
    }

    /// Latitude subdivisions.
    pub fn stacks(self) -> u32 {
        match self {
            SphereDetail::High => 40,
            SphereDetail::Low => 30,
        }
    }
}

/// Logical texture a draw refers to; the app maps slots to GPU bind groups.
///
/// Both atmosphere shells share [`TextureSlot::Clouds`], so the loader
/// decodes that file once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// Planet surface map.
    PlanetSurface,
    /// Cloud layer used by both atmosphere shells.
    Clouds,
    /// Moon surface map.
    MoonSurface,
    /// Sun surface map.
    SunSurface,
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}
