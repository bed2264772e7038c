//! YAML reader that keeps anchor identity.
//!
//! The parser's event stream is folded into a [`SourceDocument`]. An anchored
//! node gets its handle when it *starts*, so an alias inside the node itself
//! resolves to the still-open value and becomes a cycle.
//!
//! Merge keys (`<<: *base`, or `<<: [*a, *b]`) are expanded when their
//! mapping closes. Explicit keys win over merged ones, and earlier merge
//! sources win over later ones.

use std::collections::HashMap;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use super::{SourceDocument, SourceValue, ValueId};
use crate::error::SetupError;

const MERGE_KEY: &str = "<<";

enum Frame {
    Sequence {
        id: ValueId,
        items: Vec<ValueId>,
    },
    Mapping {
        id: ValueId,
        entries: Vec<(String, ValueId)>,
        pending_key: Option<String>,
    },
}

#[derive(Default)]
struct ArenaBuilder {
    doc: SourceDocument,
    stack: Vec<Frame>,
    anchors: HashMap<usize, ValueId>,
    error: Option<String>,
    finished: bool,
}

impl ArenaBuilder {
    fn register(&mut self, anchor: usize, id: ValueId) {
        if anchor > 0 {
            self.anchors.insert(anchor, id);
        }
    }

    fn attach(&mut self, id: ValueId) {
        match self.stack.last_mut() {
            None => {
                if self.doc.root().is_none() {
                    self.doc.set_root(id);
                }
            }
            Some(Frame::Sequence { items, .. }) => items.push(id),
            Some(Frame::Mapping {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                Some(key) => match entries.iter_mut().find(|(k, _)| *k == key) {
                    Some(entry) => entry.1 = id,
                    None => entries.push((key, id)),
                },
                None => match self.doc.get(id) {
                    SourceValue::Scalar(key) => *pending_key = Some(key.clone()),
                    _ => self.error = Some("mapping keys must be scalars".to_string()),
                },
            },
        }
    }

    /// Replace `<<` entries with the entries of the mappings they name.
    fn merge_entries(&mut self, entries: Vec<(String, ValueId)>) -> Vec<(String, ValueId)> {
        if !entries.iter().any(|(key, _)| key == MERGE_KEY) {
            return entries;
        }

        let mut sources = Vec::new();
        let mut explicit = Vec::new();
        for (key, value) in entries {
            if key != MERGE_KEY {
                explicit.push((key, value));
                continue;
            }
            match self.doc.get(value) {
                SourceValue::Mapping(_) => sources.push(value),
                SourceValue::Sequence(items) => sources.extend(items.iter().copied()),
                _ => {
                    self.error = Some("merge key must name a mapping".to_string());
                    return Vec::new();
                }
            }
        }

        let mut merged: Vec<(String, ValueId)> = Vec::new();
        for source in sources {
            let Some(source_entries) = self.doc.entries(source) else {
                self.error = Some("merge key must name a mapping".to_string());
                return Vec::new();
            };
            for (key, value) in source_entries {
                if !merged.iter().any(|(k, _)| k == key) {
                    merged.push((key.clone(), *value));
                }
            }
        }
        for (key, value) in explicit {
            match merged.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => merged.push((key, value)),
            }
        }
        merged
    }
}

fn is_null(value: &str, style: TScalarStyle) -> bool {
    matches!(style, TScalarStyle::Plain) && matches!(value, "" | "~" | "null" | "Null" | "NULL")
}

impl MarkedEventReceiver for ArenaBuilder {
    fn on_event(&mut self, ev: Event, _mark: Marker) {
        if self.error.is_some() || self.finished {
            return;
        }
        match ev {
            Event::Scalar(value, style, anchor, ..) => {
                let value = if is_null(&value, style) {
                    SourceValue::Null
                } else {
                    SourceValue::Scalar(value)
                };
                let id = self.doc.push(value);
                self.register(anchor, id);
                self.attach(id);
            }
            Event::SequenceStart(anchor, ..) => {
                let id = self.doc.push(SourceValue::Sequence(Vec::new()));
                self.register(anchor, id);
                self.stack.push(Frame::Sequence {
                    id,
                    items: Vec::new(),
                });
            }
            Event::MappingStart(anchor, ..) => {
                let id = self.doc.push(SourceValue::Mapping(Vec::new()));
                self.register(anchor, id);
                self.stack.push(Frame::Mapping {
                    id,
                    entries: Vec::new(),
                    pending_key: None,
                });
            }
            Event::SequenceEnd | Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Sequence { id, items }) => {
                    self.doc.replace(id, SourceValue::Sequence(items));
                    self.attach(id);
                }
                Some(Frame::Mapping { id, entries, .. }) => {
                    let entries = self.merge_entries(entries);
                    self.doc.replace(id, SourceValue::Mapping(entries));
                    self.attach(id);
                }
                None => self.error = Some("unbalanced collection end".to_string()),
            },
            Event::Alias(anchor) => match self.anchors.get(&anchor).copied() {
                Some(id) => self.attach(id),
                None => self.error = Some(format!("unknown alias #{anchor}")),
            },
            // Only the first document of a stream is read.
            Event::DocumentEnd => self.finished = true,
            _ => {}
        }
    }
}

/// Parse YAML text into a source document.
pub fn from_yaml_str(text: &str) -> Result<SourceDocument, SetupError> {
    let mut builder = ArenaBuilder::default();
    let mut parser = Parser::new(text.chars());
    parser
        .load(&mut builder, false)
        .map_err(|e| SetupError::Parse {
            format: "YAML",
            message: e.to_string(),
        })?;
    if let Some(message) = builder.error {
        return Err(SetupError::Parse {
            format: "YAML",
            message,
        });
    }
    Ok(builder.doc)
}
