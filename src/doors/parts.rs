//! Handling of door parts that went missing

use bevy_ecs::prelude::*;
use bevy_reflect::Reflect;
use std::fmt::Display;
use tracing::warn;

/// Strategy used when a door, source anchor or camera entity is missing or lacks a key component.
///
/// Defaults to warning and skipping the part.
#[derive(Resource, Default, PartialEq, Eq, Copy, Clone, Debug, Reflect)]
#[reflect(Resource)]
pub enum DoorPartErrorStrategy {
    /// Skip the part with a warning
    #[default]
    Warn,
    /// Skip the part
    Ignore,
    /// Panic
    Panic,
}

impl DoorPartErrorStrategy {
    pub(super) fn should_panic(&self) -> bool {
        self == &Self::Panic
    }

    pub(super) fn should_warn(&self) -> bool {
        self == &Self::Warn
    }
}

/// Helper function to deal with "missing" door parts,
/// see [DoorsPlugin](super::DoorsPlugin#structfield.part_error_strategy)
pub fn deal_with_part_query_error(
    strategy: &DoorPartErrorStrategy,
    query_error: &dyn Display,
    entity: Entity,
    name_of_part: &str,
) {
    if strategy.should_panic() {
        panic!("{name_of_part} #{} can't be used as a door part: {query_error}", entity.index());
    }
    if strategy.should_warn() {
        warn!("{name_of_part} #{} can't be used as a door part, skipping it: {query_error}", entity.index());
    }
}
