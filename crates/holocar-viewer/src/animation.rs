//! Per-frame animation: the floating, slowly turning car and the hologram clock.
//!
//! Both read wall-clock session time ([`Time<Real>`]), so a stalled frame does
//! not put them behind.

use bevy::prelude::*;

use crate::{
    materials::{HologramMaterial, ShowcaseMaterials},
    scene::ShowcaseCar,
};

/// Resting height of the car.
const HOVER_HEIGHT: f32 = 2.7;
/// Amplitude of the vertical bob.
const HOVER_AMPLITUDE: f32 = 0.5;
/// Yaw rate in radians per second. Negative turns clockwise seen from above.
const YAW_RATE: f32 = -0.3;

/// Plugin for the per-frame animation.
pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                animate_car,
                update_hologram_time.run_if(resource_exists::<ShowcaseMaterials>),
            ),
        );
    }
}

/// Car height and yaw at `elapsed` seconds into the session.
pub fn car_pose(elapsed: f32) -> (f32, f32) {
    (
        HOVER_HEIGHT + HOVER_AMPLITUDE * elapsed.sin(),
        YAW_RATE * elapsed,
    )
}

/// Pitch and roll the car node was authored with, as XYZ Euler angles.
///
/// The spin only replaces the yaw; these two are kept from the scene file.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct AuthoredTilt {
    pub x: f32,
    pub z: f32,
}

impl AuthoredTilt {
    pub fn from_rotation(rotation: Quat) -> Self {
        let (x, _, z) = rotation.to_euler(EulerRot::XYZ);
        Self { x, z }
    }

    /// The authored rotation with its yaw replaced by `yaw`.
    pub fn with_yaw(self, yaw: f32) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.x, yaw, self.z)
    }
}

/// Bob and spin the car. Runs whether or not the car is visible yet.
fn animate_car(
    time: Res<Time<Real>>,
    mut cars: Query<(&mut Transform, Option<&AuthoredTilt>), With<ShowcaseCar>>,
) {
    let (height, yaw) = car_pose(time.elapsed_secs());
    for (mut transform, tilt) in &mut cars {
        transform.translation.y = height;
        transform.rotation = tilt.copied().unwrap_or_default().with_yaw(yaw);
    }
}

/// Feed the session clock into the hologram shader.
fn update_hologram_time(
    time: Res<Time<Real>>,
    showcase: Res<ShowcaseMaterials>,
    mut holograms: ResMut<Assets<HologramMaterial>>,
) {
    if let Some(material) = holograms.get_mut(&showcase.hologram) {
        material.params.time = time.elapsed_secs();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::time::TimeUpdateStrategy;
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn test_car_pose_formula(t in 0.0f32..10_000.0) {
            let (height, yaw) = car_pose(t);
            prop_assert!((height - (2.7 + 0.5 * t.sin())).abs() < 1e-5);
            prop_assert!((yaw - (-0.3 * t)).abs() < 1e-3);
            prop_assert!((2.2..=3.2).contains(&height));
        }
    }

    #[test]
    fn test_car_pose_at_start() {
        assert_eq!(car_pose(0.0), (2.7, 0.0));
    }

    #[test]
    fn test_default_tilt_is_pure_yaw() {
        let rotation = AuthoredTilt::default().with_yaw(0.7);
        assert!(rotation.angle_between(Quat::from_rotation_y(0.7)) < 1e-6);
    }

    #[test]
    fn test_tilt_keeps_pitch_and_roll() {
        let authored = Quat::from_euler(EulerRot::XYZ, 0.3, 1.2, -0.2);
        let tilt = AuthoredTilt::from_rotation(authored);
        assert!((tilt.x - 0.3).abs() < 1e-5);
        assert!((tilt.z + 0.2).abs() < 1e-5);

        let spun = tilt.with_yaw(-0.5);
        let expected = Quat::from_euler(EulerRot::XYZ, 0.3, -0.5, -0.2);
        assert!(spun.angle_between(expected) < 1e-5);
    }

    fn animation_app(frame: Duration) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(frame))
            .add_plugins(AnimationPlugin);
        app
    }

    #[test]
    fn test_animate_car_follows_the_clock() {
        // Frames longer than the virtual-time clamp; the pose must follow wall time.
        let mut app = animation_app(Duration::from_millis(400));

        let car = app
            .world_mut()
            .spawn((ShowcaseCar, Transform::from_xyz(1.0, 0.0, -2.0)))
            .id();
        let bystander = app.world_mut().spawn(Transform::from_xyz(0.0, 5.0, 0.0)).id();

        for frame in 0..30 {
            app.update();
            let elapsed = app.world().resource::<Time<Real>>().elapsed_secs();
            if frame > 0 {
                assert!(elapsed > 0.39 * frame as f32);
            }
            let (height, yaw) = car_pose(elapsed);
            let transform = app.world().get::<Transform>(car).unwrap();
            assert!((transform.translation.y - height).abs() < 1e-5);
            assert!(transform.rotation.angle_between(Quat::from_rotation_y(yaw)) < 1e-4);
            // Horizontal placement from the scene file is kept.
            assert_eq!(transform.translation.x, 1.0);
            assert_eq!(transform.translation.z, -2.0);
        }

        let untouched = app.world().get::<Transform>(bystander).unwrap();
        assert_eq!(untouched.translation, Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn test_animate_car_keeps_authored_tilt() {
        let mut app = animation_app(Duration::from_millis(100));
        let tilt = AuthoredTilt { x: 0.25, z: -0.1 };
        let car = app
            .world_mut()
            .spawn((ShowcaseCar, tilt, Transform::default()))
            .id();

        for _ in 0..10 {
            app.update();
            let elapsed = app.world().resource::<Time<Real>>().elapsed_secs();
            let (_, yaw) = car_pose(elapsed);
            let rotation = app.world().get::<Transform>(car).unwrap().rotation;
            let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
            assert!((x - 0.25).abs() < 1e-4);
            assert!((z + 0.1).abs() < 1e-4);
            assert!((y - yaw).abs() < 1e-4);
        }
    }
}
