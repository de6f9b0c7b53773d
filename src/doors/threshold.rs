//! Detection of the camera walking through the open door

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_math::Vec3;
use bevy_reflect::Reflect;
use bevy_transform::prelude::*;
use tracing::debug;

use super::*;

/// Add the threshold detection to [DoorsPlugin], if enabled
pub(super) fn build_threshold(app: &mut App, threshold: Option<DoorThreshold>) {
    if let Some(threshold) = threshold {
        app
            .insert_resource(threshold)
            .register_type::<DoorThreshold>()
            .add_systems(
                Update,
                detect_door_crossings
                    .in_set(DoorsSystems::DetectEntrance)
                    .run_if(resource_exists::<DoorController>),
            );
    }
}

/// Size of the doorway used to detect the camera going through the open door.
///
/// The threshold is the plane of the door, limited to `half_width` on each side of the door's origin.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct DoorThreshold {
    pub half_width: f32,
}

impl Default for DoorThreshold {
    fn default() -> Self {
        DoorThreshold { half_width: 0.6 }
    }
}

impl DoorThreshold {
    /// Signed distance from the door plane, negative on the side facing the door's back.
    pub fn side(&self, door: &Transform, point: Vec3) -> f32 {
        (point - door.translation).dot(*door.forward())
    }

    pub fn is_within(&self, door: &Transform, point: Vec3) -> bool {
        (point - door.translation).dot(*door.right()).abs() <= self.half_width
    }

    /// Whether going from `previous_side` to `point` walks through the doorway.
    pub fn is_crossed(&self, door: &Transform, previous_side: f32, point: Vec3) -> bool {
        previous_side < 0. && self.side(door, point) >= 0. && self.is_within(door, point)
    }
}

/// Last side of the current door the camera was seen on.
#[derive(Default)]
pub struct ThresholdTracking {
    door: Option<Entity>,
    side: f32,
}

/// [System] sending [DoorEntered] when the camera walks through the open door in its forward direction.
pub fn detect_door_crossings(
    controller: Res<DoorController>,
    threshold: Res<DoorThreshold>,
    cameras: Query<&GlobalTransform>,
    doors: Query<&Transform>,
    mut tracking: Local<ThresholdTracking>,
    mut entered: MessageWriter<DoorEntered>,
) {
    if !controller.is_open() {
        tracking.door = None;
        return;
    }

    let door = controller.current_door().door;
    let (Ok(camera), Ok(door_transform)) = (cameras.get(controller.camera()), doors.get(door)) else {
        tracking.door = None;
        return;
    };
    let camera_position = camera.translation();

    if tracking.door == Some(door) && threshold.is_crossed(door_transform, tracking.side, camera_position) {
        debug!("Camera went through door #{}", door.index());
        entered.write(DoorEntered);
        tracking.door = None;
        return;
    }

    tracking.door = Some(door);
    tracking.side = threshold.side(door_transform, camera_position);
}
