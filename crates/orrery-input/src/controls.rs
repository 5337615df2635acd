//! Drag-to-rotate and wheel-to-zoom translation.
//!
//! [`DragControls`] replaces what would otherwise be free-floating
//! interaction globals: the drag flag, accumulated rotation, and the
//! last-interaction timestamp all live here and are threaded through the
//! frame loop explicitly.

use std::time::{Duration, Instant};

use winit::event::MouseButton;

use orrery_scene::Planet;

use crate::mouse::MouseState;

/// Camera distance change per scroll wheel line.
pub const ZOOM_STEP: f32 = 0.5;

/// Limit on the accumulated vertical drag rotation.
const DRAG_X_LIMIT: f32 = 40.0;

/// Accumulated drag state pushed into the planet each tick.
#[derive(Debug, Clone)]
pub struct DragControls {
    sensitivity: f32,
    invert_y: bool,
    dragging: bool,
    rotation_x: f32,
    rotation_y: f32,
    last_interaction: Instant,
}

impl DragControls {
    /// Create controls with the given degrees-per-pixel sensitivity.
    pub fn new(sensitivity: f32, invert_y: bool) -> Self {
        Self {
            sensitivity,
            invert_y,
            dragging: false,
            rotation_x: 0.0,
            rotation_y: 0.0,
            last_interaction: Instant::now(),
        }
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Accumulated rotation `(x, y)` in degrees.
    pub fn rotation(&self) -> (f32, f32) {
        (self.rotation_x, self.rotation_y)
    }

    /// Time elapsed since the last drag motion.
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_interaction)
    }

    /// Translate this frame's mouse state into planet rotation and zoom.
    ///
    /// Horizontal drag accumulates into Y rotation unbounded; vertical drag
    /// accumulates into X rotation, sign-inverted, and is clamped so the
    /// view cannot flip. Any drag motion, however small, refreshes the idle
    /// timer; the wheel does not.
    pub fn apply(&mut self, mouse: &MouseState, planet: &mut Planet, now: Instant) {
        if mouse.just_button_pressed(MouseButton::Left) {
            self.dragging = true;
        }
        if mouse.just_button_released(MouseButton::Left) {
            self.dragging = false;
        }

        if self.dragging {
            let delta = mouse.delta();
            if delta != glam::Vec2::ZERO {
                self.rotation_y += delta.x * self.sensitivity;
                let dy = if self.invert_y { delta.y } else { -delta.y };
                self.rotation_x =
                    (self.rotation_x + dy * self.sensitivity).clamp(-DRAG_X_LIMIT, DRAG_X_LIMIT);
                planet.set_user_rotation(self.rotation_x, self.rotation_y);
                self.last_interaction = now;
            }
        }

        let scroll = mouse.scroll();
        if scroll != 0.0 {
            // Scroll up zooms in (shrinks the camera distance).
            planet.set_zoom(planet.zoom() - scroll * ZOOM_STEP);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_scene::{MAX_ZOOM, MIN_ZOOM, Moon};
    use winit::event::{ElementState, MouseScrollDelta};

    fn planet() -> Planet {
        Planet::new(1.0, 1.05, Moon::new(5.0, 0.27), 20.0, 0.1)
    }

    fn controls() -> DragControls {
        DragControls::new(0.5, false)
    }

    fn drag(mouse: &mut MouseState, controls: &mut DragControls, planet: &mut Planet, dx: f64, dy: f64, now: Instant) {
        let pos = mouse.position();
        mouse.on_cursor_moved(pos.x as f64 + dx, pos.y as f64 + dy);
        controls.apply(mouse, planet, now);
        mouse.clear_transients();
    }

    #[test]
    fn test_drag_accumulates_scaled_deltas() {
        let mut mouse = MouseState::new();
        let mut controls = controls();
        let mut planet = planet();
        let now = Instant::now();

        mouse.on_button(MouseButton::Left, ElementState::Pressed);
        controls.apply(&mouse, &mut planet, now);
        mouse.clear_transients();

        drag(&mut mouse, &mut controls, &mut planet, 10.0, 0.0, now);
        drag(&mut mouse, &mut controls, &mut planet, 6.0, -4.0, now);

        let (x, y) = controls.rotation();
        // y accumulates dx * 0.5; x accumulates -dy * 0.5.
        assert!((y - 8.0).abs() < 1e-4);
        assert!((x - 2.0).abs() < 1e-4);
        assert_eq!(planet.user_rotation(), (x, y));
    }

    #[test]
    fn test_no_rotation_without_drag() {
        let mut mouse = MouseState::new();
        let mut controls = controls();
        let mut planet = planet();
        let now = Instant::now();

        drag(&mut mouse, &mut controls, &mut planet, 50.0, 50.0, now);
        assert_eq!(controls.rotation(), (0.0, 0.0));
        assert_eq!(planet.user_rotation(), (0.0, 0.0));
    }

    #[test]
    fn test_release_stops_accumulation() {
        let mut mouse = MouseState::new();
        let mut controls = controls();
        let mut planet = planet();
        let now = Instant::now();

        mouse.on_button(MouseButton::Left, ElementState::Pressed);
        controls.apply(&mouse, &mut planet, now);
        mouse.clear_transients();
        drag(&mut mouse, &mut controls, &mut planet, 10.0, 0.0, now);

        mouse.on_button(MouseButton::Left, ElementState::Released);
        controls.apply(&mouse, &mut planet, now);
        mouse.clear_transients();
        drag(&mut mouse, &mut controls, &mut planet, 10.0, 0.0, now);

        assert!((controls.rotation().1 - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_vertical_drag_clamped() {
        let mut mouse = MouseState::new();
        let mut controls = controls();
        let mut planet = planet();
        let now = Instant::now();

        mouse.on_button(MouseButton::Left, ElementState::Pressed);
        controls.apply(&mouse, &mut planet, now);
        mouse.clear_transients();

        // -200 px of upward-rotation drag per step would reach 100 degrees
        // unclamped; the limit pins it at 40.
        drag(&mut mouse, &mut controls, &mut planet, 0.0, -200.0, now);
        drag(&mut mouse, &mut controls, &mut planet, 0.0, -200.0, now);
        assert_eq!(controls.rotation().0, 40.0);
        assert_eq!(planet.user_rotation().0, 40.0);

        // The horizontal axis has no limit.
        drag(&mut mouse, &mut controls, &mut planet, 2000.0, 0.0, now);
        assert!(controls.rotation().1 > 360.0);
    }

    #[test]
    fn test_wheel_up_zooms_in_by_half() {
        let mut mouse = MouseState::new();
        let mut controls = controls();
        let mut planet = planet();
        let now = Instant::now();

        mouse.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        controls.apply(&mouse, &mut planet, now);
        mouse.clear_transients();
        assert!((planet.zoom() - 4.5).abs() < 1e-6);
    }

    #[test]
    fn test_wheel_zoom_clamps_at_min() {
        let mut mouse = MouseState::new();
        let mut controls = controls();
        let mut planet = planet();
        let now = Instant::now();

        for _ in 0..10 {
            mouse.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
            controls.apply(&mouse, &mut planet, now);
            mouse.clear_transients();
        }
        assert_eq!(planet.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_wheel_zoom_clamps_at_max() {
        let mut mouse = MouseState::new();
        let mut controls = controls();
        let mut planet = planet();
        let now = Instant::now();

        for _ in 0..40 {
            mouse.on_scroll(MouseScrollDelta::LineDelta(0.0, -1.0));
            controls.apply(&mouse, &mut planet, now);
            mouse.clear_transients();
        }
        assert_eq!(planet.zoom(), MAX_ZOOM);
    }

    #[test]
    fn test_drag_motion_refreshes_idle_timer() {
        let mut mouse = MouseState::new();
        let mut controls = controls();
        let mut planet = planet();
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(10);

        mouse.on_button(MouseButton::Left, ElementState::Pressed);
        controls.apply(&mouse, &mut planet, t0);
        mouse.clear_transients();
        drag(&mut mouse, &mut controls, &mut planet, 1.0, 0.0, t1);

        assert_eq!(controls.idle_for(t1), Duration::ZERO);
        assert_eq!(
            controls.idle_for(t1 + Duration::from_millis(2500)),
            Duration::from_millis(2500)
        );
    }

    #[test]
    fn test_wheel_does_not_refresh_idle_timer() {
        let mut mouse = MouseState::new();
        let mut controls = controls();
        let mut planet = planet();
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(5);

        mouse.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        controls.apply(&mouse, &mut planet, t1);
        mouse.clear_transients();

        assert!(controls.idle_for(t1) >= Duration::from_secs(5));
    }

    #[test]
    fn test_inverted_y_flips_vertical_sign() {
        let mut mouse = MouseState::new();
        let mut controls = DragControls::new(0.5, true);
        let mut planet = planet();
        let now = Instant::now();

        mouse.on_button(MouseButton::Left, ElementState::Pressed);
        controls.apply(&mouse, &mut planet, now);
        mouse.clear_transients();
        drag(&mut mouse, &mut controls, &mut planet, 0.0, 10.0, now);

        assert!((controls.rotation().0 - 5.0).abs() < 1e-4);
    }
}
