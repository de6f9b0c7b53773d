//! Geometry used to place doors relative to the camera

use bevy_math::{Vec2, Vec3};
use bevy_transform::prelude::*;

use super::*;

/// Distance between a surface found by the hit test and the virtual door's origin, along the surface normal.
pub const DOOR_SURFACE_OFFSET: f32 = 1.451;

/// Normalized screen point where the hit test for the virtual door is done.
pub const SCREEN_CENTER: Vec2 = Vec2::new(0.5, 0.5);

/// Position and looking direction of the AR camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub forward: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }
}

impl From<&GlobalTransform> for CameraPose {
    fn from(global_transform: &GlobalTransform) -> Self {
        Self {
            position: global_transform.translation(),
            forward: *global_transform.forward(),
        }
    }
}

/// Transform of the virtual door for a surface found by a hit test.
///
/// The door is lifted by [DOOR_SURFACE_OFFSET] along the surface normal,
/// and looks from the camera toward the hit, flattened onto the surface.
pub fn place_on_surface(hit: &HitResult, camera: &CameraPose) -> Transform {
    let hit_position = hit.position();
    let normal = hit.normal();
    let look_direction = (hit_position - camera.position).reject_from_normalized(normal);

    Transform::from_translation(hit_position + normal * DOOR_SURFACE_OFFSET)
        .looking_to(look_direction, Vec3::Y)
}

/// Transform of the reality door, one unit in front of the camera on the horizontal plane.
///
/// If the camera looks straight up or down, the door is put at the camera position with the default orientation.
pub fn place_in_front(camera: &CameraPose) -> Transform {
    let horizontal_forward = camera.forward.reject_from_normalized(Vec3::Y).normalize_or_zero();
    let translation = camera.position + horizontal_forward;
    let look_direction = (translation - camera.position).reject_from_normalized(Vec3::Y);

    Transform::from_translation(translation).looking_to(look_direction, Vec3::Y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_door_is_lifted_along_the_normal() {
        let hit = HitResult::from_position_normal(Vec3::ZERO, Vec3::Y);
        let camera = CameraPose::new(Vec3::new(0., 1.6, 3.), Vec3::NEG_Z);

        let transform = place_on_surface(&hit, &camera);

        assert!(transform.translation.abs_diff_eq(Vec3::new(0., 1.451, 0.), 1e-5));
        // Camera height is ignored, the door faces away from the camera horizontally
        assert!(transform.forward().abs_diff_eq(Vec3::NEG_Z, 1e-5));
        assert!(transform.up().abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn virtual_door_on_a_tilted_surface() {
        let normal = Vec3::new(0., 1., 1.).normalize();
        let hit = HitResult::from_position_normal(Vec3::new(2., 0., 0.), normal);
        let camera = CameraPose::new(Vec3::new(2., 0., 5.), Vec3::NEG_Z);

        let transform = place_on_surface(&hit, &camera);

        assert!(transform
            .translation
            .abs_diff_eq(Vec3::new(2., 0., 0.) + normal * DOOR_SURFACE_OFFSET, 1e-5));
        assert!(transform.forward().dot(normal).abs() < 1e-5);
    }

    #[test]
    fn reality_door_is_one_unit_in_front() {
        let camera = CameraPose::new(Vec3::ZERO, Vec3::Z);

        let transform = place_in_front(&camera);

        assert!(transform.translation.abs_diff_eq(Vec3::new(0., 0., 1.), 1e-5));
        assert!(transform.forward().abs_diff_eq(Vec3::Z, 1e-5));
    }

    #[test]
    fn reality_door_ignores_camera_pitch() {
        let camera = CameraPose::new(Vec3::new(1., 1.5, 0.), Vec3::new(1., -1., 0.).normalize());

        let transform = place_in_front(&camera);

        assert!(transform.translation.abs_diff_eq(Vec3::new(2., 1.5, 0.), 1e-5));
        assert!(transform.forward().abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn reality_door_with_camera_looking_down() {
        let camera = CameraPose::new(Vec3::new(0., 1.5, 0.), Vec3::NEG_Y);

        let transform = place_in_front(&camera);

        assert_eq!(transform.translation, camera.position);
        assert!(transform.rotation.is_finite());
    }

    #[test]
    fn camera_pose_from_global_transform() {
        let global_transform = GlobalTransform::from(
            Transform::from_xyz(1., 2., 3.).looking_to(Vec3::X, Vec3::Y),
        );

        let pose = CameraPose::from(&global_transform);

        assert!(pose.position.abs_diff_eq(Vec3::new(1., 2., 3.), 1e-5));
        assert!(pose.forward.abs_diff_eq(Vec3::X, 1e-5));
    }
}
