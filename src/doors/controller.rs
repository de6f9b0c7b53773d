//! Door state, and the systems opening and closing doors

use bevy_app::prelude::*;
use bevy_camera::visibility::Visibility;
use bevy_ecs::prelude::*;
use bevy_reflect::Reflect;
use bevy_transform::prelude::*;
use std::fmt;
use tracing::{debug, warn};

use super::*;

/// Add the controller logic to [DoorsPlugin]
pub(super) fn build_controller(app: &mut App) {
    app
        .register_type::<DoorController>()
        .register_type::<Door>()
        .register_type::<SourceAnchor>()
        .configure_sets(
            Update,
            (DoorsSystems::DetectEntrance, DoorsSystems::Close, DoorsSystems::Open).chain(),
        )
        .add_systems(
            Update,
            (
                prepare_doors
                    .run_if(resource_exists_and_changed::<DoorController>)
                    .before(DoorsSystems::DetectEntrance),
                close_entered_doors
                    .in_set(DoorsSystems::Close)
                    .run_if(resource_exists::<DoorController>),
                open_requested_doors
                    .in_set(DoorsSystems::Open)
                    .run_if(resource_exists::<DoorController>),
            ),
        );
}

/// Entities of one door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct DoorParts {
    /// Entity shown and hidden as the door
    pub door: Entity,
    /// Entity whose translation follows the door, to align the content seen through it
    pub source_anchor: Entity,
}

/// Entities used by a [DoorController].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct DoorSet {
    /// The AR camera, its [GlobalTransform] is used to place doors
    pub camera: Entity,
    pub virtual_door: DoorParts,
    pub reality_door: DoorParts,
}

/// Marker component added to the door entities of the [DoorController].
#[derive(Component, Debug, Reflect)]
pub struct Door {
    pub variant: DoorVariant,
}

/// Marker component added to the source anchors of the [DoorController].
#[derive(Component, Debug, Reflect)]
pub struct SourceAnchor {
    pub door: Entity,
}

/// Snapshot of the current door.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorState {
    pub variant: DoorVariant,
    pub is_open: bool,
    /// Where the current door was last placed
    pub transform: Transform,
}

/// Why a call to the [DoorController] changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorNoOp {
    /// A door is already open
    AlreadyOpen,
    /// No door is open
    NoDoorOpen,
    /// The hit test found nothing and [NoHitFallback::Skip] is used
    NoSurfaceFound,
}

impl fmt::Display for DoorNoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyOpen => write!(f, "a door is already open"),
            Self::NoDoorOpen => write!(f, "no door is open"),
            Self::NoSurfaceFound => write!(f, "the hit test found no surface"),
        }
    }
}

/// How the transform of an opened door was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorPlacement {
    /// On a surface found by a hit test of that kind
    Surface(HitResultKind),
    /// In front of the camera
    InFrontOfCamera,
    /// Where the door already was
    PreviousPose,
}

/// Result of [DoorController::open_door_in_front].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorOpening {
    pub variant: DoorVariant,
    pub parts: DoorParts,
    pub transform: Transform,
    pub placement: DoorPlacement,
}

#[derive(Debug, Clone, Copy, Reflect)]
struct DoorSlot {
    parts: DoorParts,
    transform: Transform,
}

/// [Resource] tracking which door is current and whether it is open.
///
/// Inserting it gives the doors to [DoorsPlugin]: both doors are then hidden,
/// and their current [Transform] is used as their previous pose.
/// At most one door is open at a time, and the variant flips every time the open door is entered.
#[derive(Resource, Debug, Reflect)]
pub struct DoorController {
    camera: Entity,
    virtual_door: DoorSlot,
    reality_door: DoorSlot,
    variant: DoorVariant,
    is_open: bool,
}

impl DoorController {
    /// Creates a controller with the virtual door as the next one, closed.
    pub fn new(doors: DoorSet) -> Self {
        Self {
            camera: doors.camera,
            virtual_door: DoorSlot {
                parts: doors.virtual_door,
                transform: Transform::IDENTITY,
            },
            reality_door: DoorSlot {
                parts: doors.reality_door,
                transform: Transform::IDENTITY,
            },
            variant: DoorVariant::Virtual,
            is_open: false,
        }
    }

    pub fn camera(&self) -> Entity {
        self.camera
    }

    pub fn variant(&self) -> DoorVariant {
        self.variant
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn doors(&self) -> DoorSet {
        DoorSet {
            camera: self.camera,
            virtual_door: self.virtual_door.parts,
            reality_door: self.reality_door.parts,
        }
    }

    pub fn parts(&self, variant: DoorVariant) -> DoorParts {
        self.slot(variant).parts
    }

    /// Parts of the door that is open, or will open next.
    pub fn current_door(&self) -> DoorParts {
        self.parts(self.variant)
    }

    pub fn state(&self) -> DoorState {
        DoorState {
            variant: self.variant,
            is_open: self.is_open,
            transform: self.slot(self.variant).transform,
        }
    }

    /// Overrides where a door was last placed, used by [NoHitFallback::KeepPreviousPose].
    pub fn set_previous_transform(&mut self, variant: DoorVariant, transform: Transform) {
        self.slot_mut(variant).transform = transform;
    }

    /// Opens the current door in front of the camera.
    ///
    /// The virtual door is placed with a hit test at [SCREEN_CENTER] (see [place_on_surface]),
    /// falling back to [DoorPlacementConfig::no_hit_fallback] when nothing is found.
    /// The reality door is placed with [place_in_front].
    pub fn open_door_in_front(
        &mut self,
        camera: &CameraPose,
        hit_test: &dyn HitTestProvider,
        config: &DoorPlacementConfig,
    ) -> Result<DoorOpening, DoorNoOp> {
        if self.is_open {
            return Err(DoorNoOp::AlreadyOpen);
        }

        let variant = self.variant;
        let (transform, placement) = match variant {
            DoorVariant::Virtual => {
                match first_hit(hit_test, SCREEN_CENTER, &config.hit_test_kinds) {
                    Some((kind, hit)) => (place_on_surface(&hit, camera), DoorPlacement::Surface(kind)),
                    None => match config.no_hit_fallback {
                        NoHitFallback::KeepPreviousPose => {
                            (self.slot(variant).transform, DoorPlacement::PreviousPose)
                        }
                        NoHitFallback::InFrontOfCamera => {
                            (place_in_front(camera), DoorPlacement::InFrontOfCamera)
                        }
                        NoHitFallback::Skip => return Err(DoorNoOp::NoSurfaceFound),
                    },
                }
            }
            DoorVariant::Reality => (place_in_front(camera), DoorPlacement::InFrontOfCamera),
        };

        let slot = self.slot_mut(variant);
        slot.transform = transform;
        let parts = slot.parts;
        self.is_open = true;

        Ok(DoorOpening {
            variant,
            parts,
            transform,
            placement,
        })
    }

    /// Closes the open door and flips the variant, returns the parts of the closed door.
    pub fn on_entrance_triggered(&mut self) -> Result<DoorParts, DoorNoOp> {
        if !self.is_open {
            return Err(DoorNoOp::NoDoorOpen);
        }
        let closed = self.current_door();
        self.is_open = false;
        self.variant = self.variant.flipped();
        Ok(closed)
    }

    fn slot(&self, variant: DoorVariant) -> &DoorSlot {
        match variant {
            DoorVariant::Virtual => &self.virtual_door,
            DoorVariant::Reality => &self.reality_door,
        }
    }

    fn slot_mut(&mut self, variant: DoorVariant) -> &mut DoorSlot {
        match variant {
            DoorVariant::Virtual => &mut self.virtual_door,
            DoorVariant::Reality => &mut self.reality_door,
        }
    }
}

/// [System] run when a [DoorController] is inserted or replaced, which tags and hides its doors.
///
/// Doors of a replaced controller that are not used by the new one are hidden.
pub fn prepare_doors(
    mut commands: Commands,
    mut controller: ResMut<DoorController>,
    strategy: Res<DoorPartErrorStrategy>,
    transforms: Query<&Transform>,
    mut prepared: Local<Option<DoorSet>>,
) {
    let doors = controller.doors();
    if *prepared == Some(doors) {
        return;
    }

    if let Some(previous) = prepared.replace(doors) {
        for parts in [previous.virtual_door, previous.reality_door] {
            let still_used = parts.door == doors.virtual_door.door || parts.door == doors.reality_door.door;
            if !still_used && transforms.contains(parts.door) {
                commands.entity(parts.door).try_insert(Visibility::Hidden);
            }
        }
    }

    for variant in [DoorVariant::Virtual, DoorVariant::Reality] {
        let parts = controller.parts(variant);

        match transforms.get(parts.door) {
            Ok(transform) => {
                controller.set_previous_transform(variant, *transform);
                commands
                    .entity(parts.door)
                    .try_insert((Door { variant }, Visibility::Hidden));
            }
            Err(query_error) => {
                deal_with_part_query_error(&strategy, &query_error, parts.door, "Door");
            }
        }

        match transforms.get(parts.source_anchor) {
            Ok(_) => {
                commands
                    .entity(parts.source_anchor)
                    .try_insert(SourceAnchor { door: parts.door });
            }
            Err(query_error) => {
                deal_with_part_query_error(&strategy, &query_error, parts.source_anchor, "Source Anchor");
            }
        }
    }
}

/// [System] opening the current door on [OpenDoorRequest], and sending [DoorOpened].
#[allow(clippy::too_many_arguments)]
pub fn open_requested_doors(
    mut requests: MessageReader<OpenDoorRequest>,
    mut opened: MessageWriter<DoorOpened>,
    mut controller: ResMut<DoorController>,
    config: Res<DoorPlacementConfig>,
    strategy: Res<DoorPartErrorStrategy>,
    session: Option<Res<ArSession>>,
    cameras: Query<&GlobalTransform>,
    mut transforms: Query<&mut Transform>,
    mut visibilities: Query<&mut Visibility>,
) {
    for _ in requests.read() {
        let camera = match cameras.get(controller.camera()) {
            Ok(global_transform) => CameraPose::from(global_transform),
            Err(query_error) => {
                deal_with_part_query_error(&strategy, &query_error, controller.camera(), "Camera");
                continue;
            }
        };

        let hit_test: &dyn HitTestProvider = match session.as_deref() {
            Some(session) => session.0.as_ref(),
            None => {
                warn!("No ArSession resource, the hit test won't find any surface");
                &NoSurfaces
            }
        };

        // A door that can't be moved or shown must not be marked open
        if !controller.is_open() {
            let door = controller.current_door().door;
            if let Err(query_error) = transforms.get(door) {
                deal_with_part_query_error(&strategy, &query_error, door, "Door");
                continue;
            }
            if let Err(query_error) = visibilities.get(door) {
                deal_with_part_query_error(&strategy, &query_error, door, "Door");
                continue;
            }
        }

        let opening = match controller.open_door_in_front(&camera, hit_test, &config) {
            Ok(opening) => opening,
            Err(no_op) => {
                debug!("Not opening a door: {no_op}");
                continue;
            }
        };

        let DoorParts { door, source_anchor } = opening.parts;

        if let Ok(mut transform) = transforms.get_mut(door) {
            transform.translation = opening.transform.translation;
            transform.rotation = opening.transform.rotation;
        }
        if let Ok(mut visibility) = visibilities.get_mut(door) {
            *visibility = Visibility::Inherited;
        }

        match transforms.get_mut(source_anchor) {
            Ok(mut transform) => transform.translation = opening.transform.translation,
            Err(query_error) => {
                deal_with_part_query_error(&strategy, &query_error, source_anchor, "Source Anchor");
            }
        }

        debug!(
            "Opened {:?} door #{} at {} ({:?})",
            opening.variant,
            door.index(),
            opening.transform.translation,
            opening.placement,
        );

        opened.write(DoorOpened {
            door,
            variant: opening.variant,
            transform: opening.transform,
        });
    }
}

/// [System] closing the open door on [DoorEntered].
pub fn close_entered_doors(
    mut entered: MessageReader<DoorEntered>,
    mut controller: ResMut<DoorController>,
    strategy: Res<DoorPartErrorStrategy>,
    mut visibilities: Query<&mut Visibility>,
) {
    for _ in entered.read() {
        match controller.on_entrance_triggered() {
            Ok(closed) => {
                match visibilities.get_mut(closed.door) {
                    Ok(mut visibility) => *visibility = Visibility::Hidden,
                    Err(query_error) => {
                        deal_with_part_query_error(&strategy, &query_error, closed.door, "Door");
                    }
                }
                debug!("Door #{} entered, next door is {:?}", closed.door.index(), controller.variant());
            }
            Err(no_op) => debug!("Ignoring door entrance: {no_op}"),
        }
    }
}
