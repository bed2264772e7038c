//! Entity definitions: the player and the item stacks they carry.

mod components;
mod player;

pub use components::*;
pub use player::*;
