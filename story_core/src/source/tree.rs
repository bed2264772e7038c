//! Readers for tree-shaped formats. Every value gets its own handle.

use super::{SourceDocument, SourceValue, ValueId};
use crate::error::SetupError;

/// Parse JSON text into a source document.
pub fn from_json_str(text: &str) -> Result<SourceDocument, SetupError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| SetupError::Parse {
        format: "JSON",
        message: e.to_string(),
    })?;
    let mut doc = SourceDocument::new();
    let root = push_json(&mut doc, &value);
    doc.set_root(root);
    Ok(doc)
}

fn push_json(doc: &mut SourceDocument, value: &serde_json::Value) -> ValueId {
    use serde_json::Value;
    let value = match value {
        Value::Null => SourceValue::Null,
        Value::Bool(b) => SourceValue::Scalar(b.to_string()),
        Value::Number(n) => SourceValue::Scalar(n.to_string()),
        Value::String(s) => SourceValue::Scalar(s.clone()),
        Value::Array(items) => {
            SourceValue::Sequence(items.iter().map(|item| push_json(doc, item)).collect())
        }
        Value::Object(map) => SourceValue::Mapping(
            map.iter()
                .map(|(key, item)| (key.clone(), push_json(doc, item)))
                .collect(),
        ),
    };
    doc.push(value)
}

/// Parse TOML text into a source document. The root is always a table.
pub fn from_toml_str(text: &str) -> Result<SourceDocument, SetupError> {
    let table: toml::Table = toml::from_str(text).map_err(|e| SetupError::Parse {
        format: "TOML",
        message: e.to_string(),
    })?;
    let mut doc = SourceDocument::new();
    if table.is_empty() {
        return Ok(doc);
    }
    let root = push_toml_table(&mut doc, &table);
    doc.set_root(root);
    Ok(doc)
}

fn push_toml_table(doc: &mut SourceDocument, table: &toml::Table) -> ValueId {
    let entries = table
        .iter()
        .map(|(key, item)| (key.clone(), push_toml(doc, item)))
        .collect();
    doc.push(SourceValue::Mapping(entries))
}

fn push_toml(doc: &mut SourceDocument, value: &toml::Value) -> ValueId {
    use toml::Value;
    let value = match value {
        Value::String(s) => SourceValue::Scalar(s.clone()),
        Value::Integer(i) => SourceValue::Scalar(i.to_string()),
        Value::Float(f) => SourceValue::Scalar(f.to_string()),
        Value::Boolean(b) => SourceValue::Scalar(b.to_string()),
        Value::Datetime(dt) => SourceValue::Scalar(dt.to_string()),
        Value::Array(items) => {
            SourceValue::Sequence(items.iter().map(|item| push_toml(doc, item)).collect())
        }
        Value::Table(table) => return push_toml_table(doc, table),
    };
    doc.push(value)
}
