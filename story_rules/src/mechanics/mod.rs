//! Story mechanics: per-node encounter state and the ways a session can end.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Opaque mutable state an encounter keeps for one story node.
///
/// Values are JSON-like so any encounter can store whatever progress it
/// needs without this crate knowing its shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncounterState {
    values: HashMap<String, Value>,
}

impl EncounterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Read an integer, falling back to `default` when missing or not an integer.
    pub fn get_u64(&self, key: &str, default: u64) -> u64 {
        self.values
            .get(key)
            .and_then(Value::as_u64)
            .unwrap_or(default)
    }

    /// Read a flag, falling back to `default` when missing or not a boolean.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    /// Insert `value` under `key` only if nothing is stored there yet.
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) {
        self.values
            .entry(key.to_string())
            .or_insert_with(|| value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// How a session finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ending {
    /// Reached a node marked as an ending.
    Completed,
    /// Survived a hazard.
    Victory,
    /// Fell to a hazard.
    Defeat,
    /// The player asked to stop.
    Quit,
    /// Input ran out.
    InputClosed,
}

impl Ending {
    /// Whether the story itself reached a conclusion (as opposed to the
    /// player walking away).
    pub fn is_story_ending(&self) -> bool {
        matches!(self, Ending::Completed | Ending::Victory | Ending::Defeat)
    }
}
