//! # Story Rules
//!
//! The data half of the story engine - player state, the story graph and the
//! per-node encounter state. This crate holds no I/O and no control flow; the
//! `story_core` crate builds graphs into these types and walks them.

pub mod entities;
pub mod mechanics;
pub mod world_state;

pub use entities::*;
pub use mechanics::*;
pub use world_state::*;
