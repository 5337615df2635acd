//! Fixed three-body scene and its per-frame draw list.

use glam::{Mat4, Vec3};

use crate::body::{CelestialBody, SphereDetail, TextureSlot, TickContext};
use crate::moon::Moon;
use crate::planet::Planet;
use crate::sun::Sun;

/// Opacity of the translucent atmosphere shells.
const ATMOSPHERE_ALPHA: f32 = 0.5;

/// Extra spin of the planet's atmosphere relative to the passive rotation.
const ATMOSPHERE_SPIN_OFFSET: f32 = 5.0;

/// One sphere to draw: a model transform plus material facts.
#[derive(Debug, Clone)]
pub struct BodyDraw {
    /// Model matrix (frame × scale), world space.
    pub model: Mat4,
    /// Which texture the sphere samples.
    pub texture: TextureSlot,
    /// Tessellation level of the sphere mesh.
    pub detail: SphereDetail,
    /// 1.0 for solid bodies, less for atmosphere shells.
    pub opacity: f32,
    /// Fullbright (the sun lights itself).
    pub emissive: bool,
}

impl BodyDraw {
    /// Whether this draw needs alpha blending.
    pub fn is_translucent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// The hardcoded sun / planet / moon scene.
pub struct Scene {
    sun: Sun,
    planet: Planet,
}

impl Scene {
    /// Build the scene with its fixed parameters: a unit-radius planet on a
    /// 20-unit orbit, a moon 5 units out, and a 10-unit sun at the origin.
    pub fn new() -> Self {
        let moon = Moon::new(5.0, 0.27);
        Self {
            sun: Sun::new(10.0),
            planet: Planet::new(1.0, 1.05, moon, 20.0, 0.1),
        }
    }

    /// Advance every body by one tick. The planet cascades to its moon.
    pub fn update(&mut self, ctx: &TickContext) {
        self.planet.update(ctx);
        self.sun.update(ctx);
    }

    /// The planet, for input to push rotation and zoom into.
    pub fn planet_mut(&mut self) -> &mut Planet {
        &mut self.planet
    }

    /// The planet.
    pub fn planet(&self) -> &Planet {
        &self.planet
    }

    /// The sun's position, which is also the scene light position.
    pub fn light_position(&self) -> Vec3 {
        Vec3::ZERO
    }

    /// Camera placement for this frame: eye offset along +Z from the
    /// planet by the current zoom, looking at the planet.
    pub fn camera_anchor(&self) -> (Vec3, Vec3) {
        let target = self.planet.position();
        let eye = target + Vec3::new(0.0, 0.0, self.planet.zoom());
        (eye, target)
    }

    /// The planet's local frame: world translation, then user X and Y
    /// rotation, then the passive spin. This composition order fixes the
    /// visual tilt and the moon's orbit plane.
    fn planet_frame(&self) -> Mat4 {
        let (user_x, user_y) = self.planet.user_rotation();
        Mat4::from_translation(self.planet.position())
            * Mat4::from_rotation_x(user_x.to_radians())
            * Mat4::from_rotation_y(user_y.to_radians())
            * Mat4::from_rotation_y(self.planet.rotation_y().to_radians())
    }

    /// The moon's frame nested inside the planet's: orbit rotation about
    /// the planet's vertical axis, then translation outward.
    fn moon_frame(&self, planet_frame: Mat4) -> Mat4 {
        let moon = self.planet.moon();
        planet_frame
            * Mat4::from_rotation_y(moon.orbit_angle().to_radians())
            * Mat4::from_translation(Vec3::new(moon.distance(), 0.0, 0.0))
    }

    /// Emit the frame's draw list: solid bodies first, then the translucent
    /// atmosphere shells so blending composites over them.
    pub fn draw_list(&self) -> Vec<BodyDraw> {
        let planet_frame = self.planet_frame();
        let moon_frame = self.moon_frame(planet_frame);
        let moon = self.planet.moon();

        vec![
            BodyDraw {
                model: Mat4::from_scale(Vec3::splat(self.sun.radius())),
                texture: TextureSlot::SunSurface,
                detail: SphereDetail::High,
                opacity: 1.0,
                emissive: true,
            },
            BodyDraw {
                model: planet_frame * Mat4::from_scale(Vec3::splat(self.planet.radius())),
                texture: TextureSlot::PlanetSurface,
                detail: SphereDetail::High,
                opacity: 1.0,
                emissive: false,
            },
            BodyDraw {
                model: moon_frame * Mat4::from_scale(Vec3::splat(moon.radius())),
                texture: TextureSlot::MoonSurface,
                detail: SphereDetail::Low,
                opacity: 1.0,
                emissive: false,
            },
            BodyDraw {
                // The planet's clouds spin 5 degrees ahead of the surface,
                // nested inside the planet frame.
                model: planet_frame
                    * Mat4::from_rotation_y(
                        (self.planet.rotation_y() + ATMOSPHERE_SPIN_OFFSET).to_radians(),
                    )
                    * Mat4::from_scale(Vec3::splat(self.planet.atmosphere_radius())),
                texture: TextureSlot::Clouds,
                detail: SphereDetail::High,
                opacity: ATMOSPHERE_ALPHA,
                emissive: false,
            },
            BodyDraw {
                // The moon's clouds rotate at half the orbit rate.
                model: moon_frame
                    * Mat4::from_rotation_y((moon.orbit_angle() * 0.5).to_radians())
                    * Mat4::from_scale(Vec3::splat(moon.atmosphere_radius())),
                texture: TextureSlot::Clouds,
                detail: SphereDetail::Low,
                opacity: ATMOSPHERE_ALPHA,
                emissive: false,
            },
        ]
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn active() -> TickContext {
        TickContext {
            idle: Duration::ZERO,
        }
    }

    #[test]
    fn test_draw_list_shape() {
        let scene = Scene::new();
        let draws = scene.draw_list();
        assert_eq!(draws.len(), 5);
        // Solid bodies precede translucent shells.
        assert!(draws[..3].iter().all(|d| !d.is_translucent()));
        assert!(draws[3..].iter().all(|d| d.is_translucent()));
        // Only the sun is emissive.
        assert_eq!(draws.iter().filter(|d| d.emissive).count(), 1);
        assert!(draws[0].emissive);
    }

    #[test]
    fn test_sun_is_at_origin() {
        let scene = Scene::new();
        let sun = &scene.draw_list()[0];
        let center = sun.model.transform_point3(Vec3::ZERO);
        assert!(center.length() < 1e-6);
        assert_eq!(scene.light_position(), Vec3::ZERO);
    }

    #[test]
    fn test_atmospheres_share_cloud_texture() {
        let scene = Scene::new();
        let draws = scene.draw_list();
        assert_eq!(draws[3].texture, TextureSlot::Clouds);
        assert_eq!(draws[4].texture, TextureSlot::Clouds);
    }

    #[test]
    fn test_moon_distance_from_planet_center() {
        let mut scene = Scene::new();
        for _ in 0..137 {
            scene.update(&active());
        }
        let draws = scene.draw_list();
        let planet_center = draws[1].model.transform_point3(Vec3::ZERO);
        let moon_center = draws[2].model.transform_point3(Vec3::ZERO);
        let d = planet_center.distance(moon_center);
        assert!((d - 5.0).abs() < 1e-3, "moon should stay 5 units out: {d}");
    }

    #[test]
    fn test_moon_orbits_in_planet_frame() {
        // With a user X tilt applied, the moon's orbit plane tilts with the
        // planet frame rather than staying in the world XZ plane.
        let mut scene = Scene::new();
        scene.planet_mut().set_user_rotation(40.0, 0.0);
        for _ in 0..180 {
            scene.update(&active());
        }
        let draws = scene.draw_list();
        let planet_center = draws[1].model.transform_point3(Vec3::ZERO);
        let moon_center = draws[2].model.transform_point3(Vec3::ZERO);
        assert!(
            (moon_center.y - planet_center.y).abs() > 0.1,
            "tilted frame should lift the moon out of the world orbital plane"
        );
    }

    #[test]
    fn test_camera_anchor_tracks_planet() {
        let mut scene = Scene::new();
        scene.planet_mut().set_zoom(7.5);
        for _ in 0..500 {
            scene.update(&active());
        }
        let (eye, target) = scene.camera_anchor();
        assert_eq!(target, scene.planet().position());
        assert!((eye - target - Vec3::new(0.0, 0.0, 7.5)).length() < 1e-6);
    }

    #[test]
    fn test_planet_scale_applied() {
        let scene = Scene::new();
        let draws = scene.draw_list();
        // A unit-sphere surface point lands at radius distance from center.
        let p = draws[1].model.transform_point3(Vec3::X);
        let center = draws[1].model.transform_point3(Vec3::ZERO);
        assert!((p.distance(center) - 1.0).abs() < 1e-5);
        let atmo = &draws[3];
        let pa = atmo.model.transform_point3(Vec3::X);
        let ca = atmo.model.transform_point3(Vec3::ZERO);
        assert!((pa.distance(ca) - 1.05).abs() < 1e-5);
    }
}
