//! # Story Core
//!
//! The engine half of the branching story system. This crate reads story
//! sources, builds them into a [`story_rules::StoryGraph`], and plays them
//! through a line-oriented console.
//!
//! ## Core Components
//!
//! - **source**: Generic nested value arena with identity handles, and readers
//! - **story_builder**: Builds the graph, sharing aliased nodes and closing cycles
//! - **encounters**: The encounter routine contract, reserved tags and the ghoul
//! - **traversal**: The session loop and player commands
//! - **console**: Terminal and scripted line I/O
//!
//! ## Design Philosophy
//!
//! - **Identity over content**: Nodes and source values are the same only when their handles are
//! - **Side tables**: Per-node mutable state lives with the session, not on the node
//! - **Closed dispatch**: New encounters are new enum variants, not engine changes

pub mod config;
pub mod console;
pub mod encounters;
pub mod error;
pub mod source;
pub mod story_builder;
pub mod traversal;

pub use config::*;
pub use console::*;
pub use encounters::*;
pub use error::{CommandError, EngineError, SetupError, StructuralError};
pub use story_builder::*;
pub use traversal::*;
