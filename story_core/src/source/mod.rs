//! Source documents - the generic nested value a story is built from.
//!
//! A source is an arena of values addressed by [`ValueId`] handles handed
//! out by the reader. Readers that understand references (YAML anchors and
//! aliases) hand out the *same* handle for every reference to one value, so
//! shared and self-referencing structures are represented without copies.
//!
//! Supported readers:
//! - **YAML** (`.yaml`, `.yml`, default) with anchors and aliases
//! - **JSON** (`.json`) and **TOML** (`.toml`), always tree-shaped

mod tree;
mod yaml;

pub use tree::{from_json_str, from_toml_str};
pub use yaml::from_yaml_str;

use serde::Serialize;
use std::path::Path;

use crate::error::SetupError;

/// Identity of a value in a [`SourceDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ValueId(pub usize);

/// One value in the source arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SourceValue {
    Null,
    Scalar(String),
    Sequence(Vec<ValueId>),
    /// Entries in source order; keys are unique.
    Mapping(Vec<(String, ValueId)>),
}

/// Arena of source values plus the document root.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceDocument {
    values: Vec<SourceValue>,
    root: Option<ValueId>,
}

impl SourceDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value and return its handle.
    pub fn push(&mut self, value: SourceValue) -> ValueId {
        let id = ValueId(self.values.len());
        self.values.push(value);
        id
    }

    /// Overwrite a value in place, keeping its identity.
    pub fn replace(&mut self, id: ValueId, value: SourceValue) {
        if let Some(slot) = self.values.get_mut(id.0) {
            *slot = value;
        }
    }

    pub fn get(&self, id: ValueId) -> &SourceValue {
        self.values.get(id.0).unwrap_or(&SourceValue::Null)
    }

    pub fn root(&self) -> Option<ValueId> {
        self.root
    }

    pub fn set_root(&mut self, root: ValueId) {
        self.root = Some(root);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries of a mapping value, `None` for anything else.
    pub fn entries(&self, id: ValueId) -> Option<&[(String, ValueId)]> {
        match self.get(id) {
            SourceValue::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up `key` in a mapping value.
    pub fn lookup(&self, id: ValueId, key: &str) -> Option<ValueId> {
        self.entries(id)?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    pub fn is_null(&self, id: ValueId) -> bool {
        matches!(self.get(id), SourceValue::Null)
    }

    /// Text form of a value: scalar text, empty for null, sequence
    /// elements joined with `", "`, and the keys of a mapping.
    pub fn text(&self, id: ValueId) -> String {
        self.text_inner(id, 0)
    }

    fn text_inner(&self, id: ValueId, depth: usize) -> String {
        // Sequences may contain themselves through aliases.
        if depth > 8 {
            return "...".to_string();
        }
        match self.get(id) {
            SourceValue::Null => String::new(),
            SourceValue::Scalar(text) => text.clone(),
            SourceValue::Sequence(items) => items
                .iter()
                .map(|item| self.text_inner(*item, depth + 1))
                .collect::<Vec<_>>()
                .join(", "),
            SourceValue::Mapping(entries) => entries
                .iter()
                .map(|(key, _)| key.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// The source formats the engine can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Yaml,
    Json,
    Toml,
}

impl SourceFormat {
    /// Pick a format by file extension, defaulting to YAML.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => SourceFormat::Json,
            Some("toml") => SourceFormat::Toml,
            _ => SourceFormat::Yaml,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SourceFormat::Yaml => "YAML",
            SourceFormat::Json => "JSON",
            SourceFormat::Toml => "TOML",
        }
    }
}

/// Parse source text in the given format.
pub fn parse_source(text: &str, format: SourceFormat) -> Result<SourceDocument, SetupError> {
    match format {
        SourceFormat::Yaml => from_yaml_str(text),
        SourceFormat::Json => from_json_str(text),
        SourceFormat::Toml => from_toml_str(text),
    }
}

/// Read and parse a source file, choosing the reader by extension.
pub fn load_source(path: &Path) -> Result<SourceDocument, SetupError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            SetupError::NotFound(path.to_path_buf())
        } else {
            SetupError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let format = SourceFormat::from_path(path);
    tracing::debug!(path = %path.display(), format = format.name(), "parsing story source");
    parse_source(&text, format)
}
