//! Error types for loading, building and playing a story.

use std::path::PathBuf;
use thiserror::Error;

/// Problems that stop a session from starting.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("story file {} not found", .0.display())]
    NotFound(PathBuf),

    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {format} source: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("story source is empty")]
    EmptySource,

    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error("invalid config: {0}")]
    Config(String),
}

/// A node spec that has the right fields in the wrong shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructuralError {
    #[error("`items` of node {node:?} must be a mapping of item-name -> qty")]
    MalformedItems { node: String },

    #[error("`exits` of node {node:?} must be a mapping of direction -> node-spec")]
    MalformedExits { node: String },

    #[error("item {item:?} of node {node:?} has invalid count {value:?}")]
    InvalidItemCount {
        node: String,
        item: String,
        value: String,
    },

    #[error("`{field}` of node {node:?} must be a boolean, got {value:?}")]
    InvalidFlag {
        node: String,
        field: &'static str,
        value: String,
    },
}

/// A rejected player command. Reported inline; never ends the session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("No exit that way.")]
    UnknownDirection(String),

    #[error("There's no {0} here to take.")]
    NothingToTake(String),

    #[error("Take what? Usage: take <item> [qty]")]
    MissingItemName,

    #[error("Can't take {0} of something.")]
    InvalidQuantity(u32),

    #[error("You don't have enough gold (need {needed}, have {available}).")]
    InsufficientGold { needed: i64, available: i64 },

    #[error("{0}")]
    UnknownAction(String),
}

/// Fatal failure while a session is running.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("console I/O failed: {0}")]
    Console(#[from] std::io::Error),

    #[error("story graph has no node {0}")]
    MissingNode(story_rules::NodeId),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_error_names_field() {
        let err = StructuralError::MalformedExits {
            node: "cave".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("exits"));
        assert!(message.contains("cave"));
    }

    #[test]
    fn test_setup_error_wraps_structural() {
        let err: SetupError = StructuralError::MalformedItems {
            node: "hall".to_string(),
        }
        .into();
        assert!(matches!(err, SetupError::Structural(_)));
        assert!(err.to_string().contains("items"));
    }

    #[test]
    fn test_command_error_messages() {
        assert_eq!(
            CommandError::UnknownDirection("up".into()).to_string(),
            "No exit that way."
        );
        assert_eq!(
            CommandError::NothingToTake("rope".into()).to_string(),
            "There's no rope here to take."
        );
    }
}
