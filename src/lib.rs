//! Bevy Portal Doors is a Bevy game engine plugin to open augmented reality "portal" doors.
//!
//! Two doors take turns: a door to the virtual world, placed on a surface found by a hit test
//! at the center of the screen, and a door back to reality, placed one unit in front of the camera.
//! Walking through the open door closes it, and the other door will be the next one to open.
//!
//! ## Basic Usage
//! ```rust,no_run
#![doc = include_str!("../demos/basic/main.rs")]
//! ```
//!
//! ## Vocabulary
//! - A Door is an entity marking a transition point between two content spaces
//! - A Variant is which of the two doors (virtual or reality) will open next
//! - A Source Anchor is an entity paired with a door, moved with it to align the content seen through it
//! - A Hit Test is a query against surfaces detected by the AR session, see [HitTestProvider]
//!
//! ## Known limitations
//! - the AR session is not provided by this crate, you have to install an [ArSession] wrapping your platform's hit test
//! - hit test results are taken in the order the provider returns them, no distance or confidence comparison is done
//! - the built-in threshold detection only detects walking through a door in its forward direction
//! - doors and source anchors are expected to be top-level entities (it uses Transform instead of GlobalTransform)

pub mod doors;
pub use doors::*;
#[doc(inline)]
pub use doors::{DoorController, DoorsPlugin};
