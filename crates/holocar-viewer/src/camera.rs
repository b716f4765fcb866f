//! Orbit camera with inertial damping.
//!
//! Left-drag orbits around the target, right-drag pans and the mouse wheel
//! dollies. Drag input is queued as pending deltas; each frame a fraction of
//! the pending motion (the damping factor) is applied and the rest decays, so
//! the camera glides to a stop after the pointer is released.
//!
//! Spherical coordinates follow the usual Y-up convention: `theta` is the
//! azimuth measured from +Z toward +X, `phi` the polar angle from +Y.

use std::f32::consts::{PI, TAU};

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::input::egui_wants_any_pointer_input;
use leafwing_input_manager::prelude::*;

/// Fraction of pending motion applied per frame.
pub const DEFAULT_DAMPING_FACTOR: f32 = 0.05;

/// Radius multiplier per wheel step when zooming in.
const ZOOM_SCALE: f32 = 0.95;

/// Keeps the polar angle away from the poles so `looking_at` stays stable.
const POLAR_EPSILON: f32 = 1.0e-6;

/// Pending motion below this is considered settled.
const SETTLE_EPSILON: f32 = 1.0e-5;

/// Plugin for the orbit camera controls.
pub struct OrbitCameraPlugin;

impl Plugin for OrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<OrbitAction>::default())
            .add_systems(
                Update,
                (
                    orbit_camera_input.run_if(not(egui_wants_any_pointer_input)),
                    update_orbit_camera,
                )
                    .chain(),
            );
    }
}

/// Pointer actions for the orbit camera.
#[derive(Actionlike, PartialEq, Eq, Hash, Clone, Copy, Debug, Reflect)]
pub enum OrbitAction {
    /// Pointer movement this frame.
    #[actionlike(DualAxis)]
    Drag,
    /// Held to orbit (left button).
    Rotate,
    /// Held to pan (right button).
    Pan,
    /// Wheel steps (positive = zoom in).
    #[actionlike(Axis)]
    Zoom,
}

/// Create the default input map for the orbit camera.
pub fn default_orbit_input_map() -> InputMap<OrbitAction> {
    InputMap::default()
        .with_dual_axis(OrbitAction::Drag, MouseMove::default())
        .with(OrbitAction::Rotate, MouseButton::Left)
        .with(OrbitAction::Pan, MouseButton::Right)
        .with_axis(OrbitAction::Zoom, MouseScrollAxis::Y)
}

/// Orbit camera state.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Point the camera orbits around and looks at.
    pub target: Vec3,
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pending_theta: f32,
    pending_phi: f32,
    pending_pan: Vec3,
    pending_scale: f32,
}

impl OrbitCamera {
    /// Orbit state for a camera at `position` looking at `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let radius = offset.length();
        let (theta, phi) = if radius > 0.0 {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        } else {
            (0.0, PI / 2.0)
        };
        Self {
            target,
            radius,
            theta,
            phi,
            damping_factor: DEFAULT_DAMPING_FACTOR,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.1,
            max_distance: 100.0,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_pan: Vec3::ZERO,
            pending_scale: 1.0,
        }
    }

    /// Camera position implied by the current spherical coordinates.
    pub fn position(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + self.radius
                * Vec3::new(
                    sin_phi * self.theta.sin(),
                    self.phi.cos(),
                    sin_phi * self.theta.cos(),
                )
    }

    /// Queue an orbit from a pointer drag of `delta` pixels.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.pending_theta -= TAU * delta.x / viewport_height * self.rotate_speed;
        self.pending_phi -= TAU * delta.y / viewport_height * self.rotate_speed;
    }

    /// Queue a dolly of `steps` wheel steps (positive moves closer).
    pub fn zoom(&mut self, steps: f32) {
        self.pending_scale *= ZOOM_SCALE.powf(steps * self.zoom_speed);
    }

    /// Queue a screen-space pan from a pointer drag of `delta` pixels.
    pub fn pan(&mut self, delta: Vec2, viewport_height: f32, fov: f32, rotation: Quat) {
        if viewport_height <= 0.0 {
            return;
        }
        let target_distance = self.radius * (fov / 2.0).tan();
        let scale = 2.0 * target_distance / viewport_height * self.pan_speed;
        let right = rotation * Vec3::X;
        let up = rotation * Vec3::Y;
        self.pending_pan += -right * delta.x * scale + up * delta.y * scale;
    }

    /// Whether any queued motion remains.
    pub fn is_settled(&self) -> bool {
        self.pending_theta.abs() < SETTLE_EPSILON
            && self.pending_phi.abs() < SETTLE_EPSILON
            && self.pending_pan.length() < SETTLE_EPSILON
            && (self.pending_scale - 1.0).abs() < SETTLE_EPSILON
    }

    /// Advance one frame of damping and return the new camera position.
    pub fn update(&mut self) -> Vec3 {
        let damping = self.damping_factor;

        self.theta += self.pending_theta * damping;
        self.phi = (self.phi + self.pending_phi * damping).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.radius = (self.radius * self.pending_scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pending_pan * damping;

        self.pending_theta *= 1.0 - damping;
        self.pending_phi *= 1.0 - damping;
        self.pending_pan *= 1.0 - damping;
        self.pending_scale = 1.0;

        self.position()
    }
}

/// Queue orbit, pan and zoom input on the camera.
fn orbit_camera_input(
    window: Single<&Window, With<PrimaryWindow>>,
    mut query: Query<(
        &ActionState<OrbitAction>,
        &mut OrbitCamera,
        &Transform,
        &Projection,
    )>,
) {
    let viewport_height = window.height();

    for (action_state, mut orbit, transform, projection) in &mut query {
        let drag = action_state.axis_pair(&OrbitAction::Drag);
        if drag != Vec2::ZERO {
            if action_state.pressed(&OrbitAction::Rotate) {
                orbit.rotate(drag, viewport_height);
            } else if action_state.pressed(&OrbitAction::Pan) {
                let fov = match projection {
                    Projection::Perspective(perspective) => perspective.fov,
                    _ => std::f32::consts::FRAC_PI_4,
                };
                orbit.pan(drag, viewport_height, fov, transform.rotation);
            }
        }

        // One dolly step per frame of wheel input; line and pixel scroll units differ wildly.
        let zoom = action_state.value(&OrbitAction::Zoom);
        if zoom != 0.0 {
            orbit.zoom(zoom.signum());
        }
    }
}

/// Apply damping and move the camera.
fn update_orbit_camera(mut query: Query<(&mut OrbitCamera, &mut Transform)>) {
    for (mut orbit, mut transform) in &mut query {
        let position = orbit.update();
        *transform = Transform::from_translation(position).looking_at(orbit.target, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: Vec3 = Vec3::new(3.0, 3.0, 3.0);

    #[test]
    fn test_looking_at_round_trips_position() {
        let orbit = OrbitCamera::looking_at(START, Vec3::ZERO);
        assert!((orbit.radius - 27.0_f32.sqrt()).abs() < 1e-5);
        assert!(orbit.position().distance(START) < 1e-5);
    }

    #[test]
    fn test_update_without_input_is_stationary() {
        let mut orbit = OrbitCamera::looking_at(START, Vec3::ZERO);
        for _ in 0..10 {
            assert!(orbit.update().distance(START) < 1e-5);
        }
        assert!(orbit.is_settled());
    }

    #[test]
    fn test_rotation_glides_and_settles() {
        let mut orbit = OrbitCamera::looking_at(START, Vec3::ZERO);
        orbit.rotate(Vec2::new(100.0, 0.0), 800.0);

        let theta_start = orbit.theta;
        orbit.update();
        let first_step = (orbit.theta - theta_start).abs();
        let theta_mid = orbit.theta;
        orbit.update();
        let second_step = (orbit.theta - theta_mid).abs();

        assert!(first_step > 0.0);
        // Each frame applies less than the previous one.
        assert!(second_step < first_step);
        assert!((second_step - first_step * (1.0 - DEFAULT_DAMPING_FACTOR)).abs() < 1e-6);

        for _ in 0..1000 {
            orbit.update();
        }
        assert!(orbit.is_settled());
        // Total motion converges to the full drag.
        let expected = TAU * 100.0 / 800.0;
        assert!(((theta_start - orbit.theta) - expected).abs() < 1e-3);
        // Orbiting keeps the distance to the target.
        assert!((orbit.position().length() - 27.0_f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let mut orbit = OrbitCamera::looking_at(START, Vec3::ZERO);
        orbit.rotate(Vec2::new(0.0, 100_000.0), 100.0);
        for _ in 0..200 {
            orbit.update();
        }
        assert!(orbit.phi > 0.0);
        assert!(orbit.phi < PI);
    }

    #[test]
    fn test_zoom_in_and_out() {
        let mut orbit = OrbitCamera::looking_at(START, Vec3::ZERO);
        let radius = orbit.radius;
        orbit.zoom(1.0);
        orbit.update();
        assert!((orbit.radius - radius * ZOOM_SCALE).abs() < 1e-5);
        orbit.zoom(-1.0);
        orbit.update();
        assert!((orbit.radius - radius).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_respects_distance_limits() {
        let mut orbit = OrbitCamera::looking_at(START, Vec3::ZERO);
        orbit.zoom(-1000.0);
        orbit.update();
        assert_eq!(orbit.radius, orbit.max_distance);
        orbit.zoom(1000.0);
        orbit.update();
        assert_eq!(orbit.radius, orbit.min_distance);
    }

    #[test]
    fn test_pan_moves_target_sideways() {
        let mut orbit = OrbitCamera::looking_at(START, Vec3::ZERO);
        let rotation = Transform::from_translation(START)
            .looking_at(Vec3::ZERO, Vec3::Y)
            .rotation;
        orbit.pan(Vec2::new(50.0, 0.0), 800.0, 75.0_f32.to_radians(), rotation);
        for _ in 0..1000 {
            orbit.update();
        }
        let right = rotation * Vec3::X;
        // Dragging right moves the target to the camera's left.
        assert!(orbit.target.dot(right) < 0.0);
        assert!(orbit.target.y.abs() < 1e-4);
    }
}
