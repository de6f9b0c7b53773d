//! Plugin, configuration and messages to use portal doors without caring about their implementation

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_reflect::Reflect;

use super::*;

/// [Plugin] to add support for portal doors to a bevy App.
///
/// The doors themselves are given to the plugin by inserting a [DoorController] resource,
/// see [DoorController::new].
pub struct DoorsPlugin {
    /// Kinds of hit test results to try, in order of priority, when placing the virtual door.
    ///
    /// The first kind returning at least one result is used. Defaults to [HitResultKind::ExistingPlaneExtent] only.
    pub hit_test_kinds: Vec<HitResultKind>,
    /// What to do when the hit test for the virtual door returns nothing.
    pub no_hit_fallback: NoHitFallback,
    /// If `Some`, detects the camera walking through the open door and sends [DoorEntered] on its own.
    ///
    /// Set it to `None` if another system (a physics trigger for example) sends [DoorEntered].
    pub threshold: Option<DoorThreshold>,
    /// What to do when a door, source anchor or camera entity is missing.
    ///
    /// Defaults/`None` to warn and skip the part.
    /// Will be added as a [Resource], can be changed during execution.
    pub part_error_strategy: Option<DoorPartErrorStrategy>,
}

impl Default for DoorsPlugin {
    fn default() -> Self {
        DoorsPlugin {
            hit_test_kinds: vec![HitResultKind::ExistingPlaneExtent],
            no_hit_fallback: NoHitFallback::default(),
            threshold: Some(DoorThreshold::default()),
            part_error_strategy: None,
        }
    }
}

impl DoorsPlugin {
    /// No threshold detection, and a panic on missing door parts.
    ///
    /// [DoorEntered] has to be sent by the app, or the threshold added back.
    pub fn minimal() -> Self {
        Self {
            threshold: None,
            part_error_strategy: Some(DoorPartErrorStrategy::Panic),
            ..Self::default()
        }
    }
}

impl Plugin for DoorsPlugin {
    fn build(&self, app: &mut App) {
        app
            .insert_resource(DoorPlacementConfig {
                hit_test_kinds: self.hit_test_kinds.clone(),
                no_hit_fallback: self.no_hit_fallback,
            })
            .insert_resource(self.part_error_strategy.unwrap_or_default())
            .register_type::<DoorPlacementConfig>()
            .register_type::<DoorPartErrorStrategy>()
            .add_message::<OpenDoorRequest>()
            .add_message::<DoorEntered>()
            .add_message::<DoorOpened>();

        build_controller(app);
        build_threshold(app, self.threshold);
    }
}

/// System sets of [DoorsPlugin], run in that order during [Update].
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorsSystems {
    /// Built-in threshold detection, sends [DoorEntered]
    DetectEntrance,
    /// Closes the door on [DoorEntered]
    Close,
    /// Opens the door on [OpenDoorRequest]
    Open,
}

/// Configuration of the placement of doors.
///
/// Added as a [Resource] by [DoorsPlugin], can be changed during execution.
#[derive(Resource, Clone, Debug, Reflect)]
#[reflect(Resource)]
pub struct DoorPlacementConfig {
    pub hit_test_kinds: Vec<HitResultKind>,
    pub no_hit_fallback: NoHitFallback,
}

impl Default for DoorPlacementConfig {
    fn default() -> Self {
        DoorPlacementConfig {
            hit_test_kinds: vec![HitResultKind::ExistingPlaneExtent],
            no_hit_fallback: NoHitFallback::default(),
        }
    }
}

/// Which of the two doors is (or will be) the current one.
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone, Hash, Reflect)]
pub enum DoorVariant {
    /// Door leading into the virtual content, placed with a hit test
    #[default]
    Virtual,
    /// Door leading back to reality, placed in front of the camera
    Reality,
}

impl DoorVariant {
    /// The other variant.
    pub fn flipped(self) -> Self {
        match self {
            Self::Virtual => Self::Reality,
            Self::Reality => Self::Virtual,
        }
    }
}

/// Kind of surface a hit test looks for.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Reflect)]
pub enum HitResultKind {
    /// Detected planes, within their estimated extent
    ExistingPlaneExtent,
    /// Detected planes, considered infinite
    ExistingPlaneInfinite,
    /// Feature points of the point cloud
    FeaturePoint,
}

/// What to do when the hit test used to place the virtual door finds no surface.
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone, Reflect)]
pub enum NoHitFallback {
    /// Open the door where it was last placed (its initial transform the first time)
    KeepPreviousPose,
    /// Open the door in front of the camera, like the reality door
    #[default]
    InFrontOfCamera,
    /// Don't open the door
    Skip,
}

/// Message asking to open the current door in front of the camera.
///
/// Typically sent by a "spawn portal" button. Ignored if a door is already open.
#[derive(Message, Debug, Default, Clone, Copy)]
pub struct OpenDoorRequest;

/// Message telling that the camera went through the open door.
///
/// Sent by the built-in threshold detection (see [DoorsPlugin::threshold]) or by any other trigger.
/// Ignored if no door is open.
#[derive(Message, Debug, Default, Clone, Copy)]
pub struct DoorEntered;

/// Message sent after a door opened.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct DoorOpened {
    pub door: Entity,
    pub variant: DoorVariant,
    /// Where the door was placed
    pub transform: bevy_transform::components::Transform,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_plugin_skips_threshold_detection() {
        let mut app = App::new();
        app.add_plugins(DoorsPlugin::minimal());

        assert!(app.world().get_resource::<DoorThreshold>().is_none());
        assert_eq!(
            *app.world().resource::<DoorPartErrorStrategy>(),
            DoorPartErrorStrategy::Panic
        );
        assert_eq!(
            app.world().resource::<DoorPlacementConfig>().hit_test_kinds,
            vec![HitResultKind::ExistingPlaneExtent]
        );
    }

    #[test]
    fn default_plugin_detects_thresholds_and_warns() {
        let mut app = App::new();
        app.add_plugins(DoorsPlugin::default());

        assert_eq!(app.world().get_resource::<DoorThreshold>(), Some(&DoorThreshold::default()));
        assert_eq!(
            *app.world().resource::<DoorPartErrorStrategy>(),
            DoorPartErrorStrategy::Warn
        );
        assert_eq!(
            app.world().resource::<DoorPlacementConfig>().no_hit_fallback,
            NoHitFallback::InFrontOfCamera
        );
    }
}
