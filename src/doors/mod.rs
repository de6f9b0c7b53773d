//! Components, systems and helpers to place and toggle portal doors

mod api;
pub use api::*;
mod hit_test;
pub use hit_test::*;
mod placement;
pub use placement::*;
mod controller;
pub use controller::*;
mod threshold;
pub use threshold::*;
mod parts;
pub use parts::*;
