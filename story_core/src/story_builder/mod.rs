//! Story Graph Builder - turns a source document into a story graph.
//!
//! The builder works as follows:
//! 1. **Root**: A top-level mapping with a single entry is a named wrapper
//!    around the root spec; anything else is the root spec itself
//! 2. **Shorthand**: A non-mapping spec becomes a description-only node
//! 3. **Fields**: A mapping spec supplies `description`, `encounter`, `end`,
//!    `items` and `exits`
//! 4. **Memoization**: Built nodes are cached by source [`ValueId`], and a
//!    node is cached *before* its exits are built, so aliases resolve to one
//!    node and cycles terminate

use std::collections::HashMap;
use std::path::Path;

use story_rules::{Inventory, NodeId, StoryGraph};

use crate::error::{SetupError, StructuralError};
use crate::source::{load_source, SourceDocument, SourceValue, ValueId};

/// Read a story file and build its graph.
pub fn load_story(path: &Path) -> Result<StoryGraph, SetupError> {
    let doc = load_source(path)?;
    build_story(&doc)
}

/// Build a story graph from a parsed source document.
pub fn build_story(doc: &SourceDocument) -> Result<StoryGraph, SetupError> {
    StoryBuilder::new(doc).build()
}

/// Single-use builder holding the identity cache for one document.
pub struct StoryBuilder<'a> {
    doc: &'a SourceDocument,
    graph: StoryGraph,
    cache: HashMap<ValueId, NodeId>,
}

impl<'a> StoryBuilder<'a> {
    pub fn new(doc: &'a SourceDocument) -> Self {
        Self {
            doc,
            graph: StoryGraph::empty(),
            cache: HashMap::new(),
        }
    }

    /// Select the root spec and build everything reachable from it.
    pub fn build(mut self) -> Result<StoryGraph, SetupError> {
        let root_spec = self.root_spec()?;
        let root = self.build_node(root_spec)?;
        self.graph.set_root(root);

        tracing::debug!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "story graph built"
        );
        Ok(self.graph)
    }

    fn root_spec(&self) -> Result<ValueId, SetupError> {
        let top = self
            .doc
            .root()
            .filter(|id| !self.doc.is_null(*id))
            .ok_or(SetupError::EmptySource)?;
        match self.doc.entries(top) {
            Some([(_, only)]) => Ok(*only),
            _ => Ok(top),
        }
    }

    /// Build (or fetch from cache) the node for `spec`.
    pub fn build_node(&mut self, spec: ValueId) -> Result<NodeId, StructuralError> {
        if let Some(&id) = self.cache.get(&spec) {
            return Ok(id);
        }
        let doc = self.doc;

        if doc.entries(spec).is_none() {
            let id = self.graph.add_node(doc.text(spec));
            self.cache.insert(spec, id);
            return Ok(id);
        }

        let description = doc
            .lookup(spec, "description")
            .map(|v| doc.text(v))
            .unwrap_or_default();
        let encounter = doc
            .lookup(spec, "encounter")
            .filter(|v| !doc.is_null(*v))
            .map(|v| doc.text(v));
        let end = read_flag(doc, spec, "end", &description)?;
        let items = read_items(doc, spec, &description)?;

        let id = self.graph.add_node(description.clone());
        // Registered before recursing so re-entry finds the in-progress node.
        self.cache.insert(spec, id);
        if let Some(node) = self.graph.get_node_mut(id) {
            node.encounter = encounter;
            node.end = end;
            node.items = items;
        }

        let exits = match doc.lookup(spec, "exits").map(|v| doc.get(v)) {
            None | Some(SourceValue::Null) => return Ok(id),
            Some(SourceValue::Mapping(entries)) => entries,
            Some(_) => return Err(StructuralError::MalformedExits { node: description }),
        };
        for (direction, child_spec) in exits {
            let child = self.build_node(*child_spec)?;
            if let Some(node) = self.graph.get_node_mut(id) {
                node.add_exit(direction.clone(), child);
            }
        }
        Ok(id)
    }
}

fn read_flag(
    doc: &SourceDocument,
    spec: ValueId,
    field: &'static str,
    node: &str,
) -> Result<bool, StructuralError> {
    let Some(value) = doc.lookup(spec, field) else {
        return Ok(false);
    };
    let invalid = || StructuralError::InvalidFlag {
        node: node.to_string(),
        field,
        value: doc.text(value),
    };
    match doc.get(value) {
        SourceValue::Null => Ok(false),
        SourceValue::Scalar(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" | "" => Ok(false),
            _ => Err(invalid()),
        },
        _ => Err(invalid()),
    }
}

fn read_items(
    doc: &SourceDocument,
    spec: ValueId,
    node: &str,
) -> Result<Inventory, StructuralError> {
    let entries = match doc.lookup(spec, "items").map(|v| doc.get(v)) {
        None | Some(SourceValue::Null) => return Ok(Inventory::new()),
        Some(SourceValue::Mapping(entries)) => entries,
        Some(_) => {
            return Err(StructuralError::MalformedItems {
                node: node.to_string(),
            })
        }
    };

    let mut items = Inventory::new();
    for (name, value) in entries {
        let text = doc.text(*value);
        let quantity = text
            .trim()
            .parse::<u32>()
            .map_err(|_| StructuralError::InvalidItemCount {
                node: node.to_string(),
                item: name.clone(),
                value: text.clone(),
            })?;
        items.add(name, quantity);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{from_json_str, from_yaml_str};

    fn build_yaml(text: &str) -> StoryGraph {
        build_story(&from_yaml_str(text).unwrap()).unwrap()
    }

    #[test]
    fn test_shared_reference_is_one_node() {
        let graph = build_yaml(
            r#"
start:
  description: Fork in the road
  exits:
    left: &inn
      description: An inn
    right: *inn
"#,
        );
        let left = graph.walk(["left"]).unwrap();
        let right = graph.walk(["right"]).unwrap();
        assert_eq!(left, right);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_self_reference_builds_cycle() {
        let graph = build_yaml(
            r#"
start: &start
  description: Crossroads
  exits:
    north:
      description: Field
      exits:
        back: *start
"#,
        );
        let root = graph.root();
        assert_eq!(graph.walk(["north", "back"]), Some(root));
        assert_eq!(graph.walk(["north", "back", "north", "back"]), Some(root));
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_direct_self_loop() {
        let graph = build_yaml(
            r#"
hall: &hall
  description: Endless hall
  exits:
    onward: *hall
"#,
        );
        assert_eq!(graph.walk(["onward"]), Some(graph.root()));
    }

    #[test]
    fn test_mutual_references() {
        let graph = build_yaml(
            r#"
- &a
  description: A
  exits:
    to_b: &b
      description: B
      exits:
        to_a: *a
- *b
"#,
        );
        // A sequence root is not unwrapped, so it becomes a shorthand node.
        assert!(graph.get_node(graph.root()).unwrap().exits().is_empty());

        let graph = build_yaml(
            r#"
start: &a
  description: A
  exits:
    to_b:
      description: B
      exits:
        to_a: *a
"#,
        );
        let b = graph.walk(["to_b"]).unwrap();
        assert_eq!(graph.follow(b, "to_a"), Some(graph.root()));
    }

    #[test]
    fn test_identical_content_distinct_nodes() {
        let doc = from_json_str(
            r#"{"description": "Room", "exits": {
                "a": {"description": "Same"},
                "b": {"description": "Same"}}}"#,
        )
        .unwrap();
        let graph = build_story(&doc).unwrap();
        assert_ne!(graph.walk(["a"]), graph.walk(["b"]));
    }

    #[test]
    fn test_scalar_shorthand() {
        let graph = build_yaml(
            r#"
start:
  description: Gate
  exits:
    east: A quiet meadow
    west: 42
"#,
        );
        let east = graph.get_node(graph.walk(["east"]).unwrap()).unwrap();
        assert_eq!(east.description, "A quiet meadow");
        assert!(east.encounter.is_none());
        assert!(!east.end);
        assert!(east.exits().is_empty());

        let west = graph.get_node(graph.walk(["west"]).unwrap()).unwrap();
        assert_eq!(west.description, "42");
    }

    #[test]
    fn test_named_root_unwrapped_only_for_single_entry() {
        let graph = build_yaml("world:\n  description: Inside\n");
        assert_eq!(graph.get_node(graph.root()).unwrap().description, "Inside");

        let graph = build_yaml("description: Top\nend: yes\n");
        let root = graph.get_node(graph.root()).unwrap();
        assert_eq!(root.description, "Top");
        assert!(root.end);
    }

    #[test]
    fn test_full_node_fields() {
        let graph = build_yaml(
            r#"
start:
  description: Cellar
  encounter: ghoul
  end: false
  items:
    rope: 2
    lamp: 1
    dust: 0
  exits:
    up:
      description: Daylight
      end: true
"#,
        );
        let root = graph.get_node(graph.root()).unwrap();
        assert_eq!(root.encounter.as_deref(), Some("ghoul"));
        assert_eq!(root.items.count("rope"), 2);
        assert_eq!(root.items.count("lamp"), 1);
        assert!(!root.items.contains("dust"));
        assert_eq!(root.items.len(), 2);

        let up = graph.get_node(graph.walk(["up"]).unwrap()).unwrap();
        assert!(up.end);
    }

    #[test]
    fn test_merge_key_fills_node_fields() {
        let graph = build_yaml(
            r#"
start:
  description: Gate
  exits:
    left: &hall
      description: A long hall
      encounter: ghoul
    right:
      <<: *hall
      end: true
"#,
        );
        let left = graph.walk(["left"]).unwrap();
        let right = graph.walk(["right"]).unwrap();
        assert_ne!(left, right);

        let right = graph.get_node(right).unwrap();
        assert_eq!(right.description, "A long hall");
        assert_eq!(right.encounter.as_deref(), Some("ghoul"));
        assert!(right.end);
        assert!(!graph.get_node(left).unwrap().end);
    }

    #[test]
    fn test_exit_order_follows_source() {
        let graph = build_yaml(
            r#"
start:
  exits:
    straight: a
    left: b
    right: c
"#,
        );
        let dirs: Vec<_> = graph.get_node(graph.root()).unwrap().directions().collect();
        assert_eq!(dirs, vec!["straight", "left", "right"]);
    }

    #[test]
    fn test_null_encounter_items_and_exits() {
        let graph = build_yaml("start:\n  description: x\n  encounter:\n  items:\n  exits:\n");
        let root = graph.get_node(graph.root()).unwrap();
        assert!(root.encounter.is_none());
        assert!(root.items.is_empty());
        assert!(root.exits().is_empty());
    }

    #[test]
    fn test_malformed_items() {
        let doc = from_yaml_str("start:\n  description: Shop\n  items: [rope]\n").unwrap();
        let err = build_story(&doc).unwrap_err();
        assert!(matches!(
            err,
            SetupError::Structural(StructuralError::MalformedItems { ref node }) if node == "Shop"
        ));
    }

    #[test]
    fn test_invalid_item_count() {
        let doc = from_yaml_str("start:\n  items:\n    rope: -1\n").unwrap();
        let err = build_story(&doc).unwrap_err();
        assert!(matches!(
            err,
            SetupError::Structural(StructuralError::InvalidItemCount { ref item, .. }) if item == "rope"
        ));
    }

    #[test]
    fn test_malformed_exits() {
        let doc = from_yaml_str("start:\n  description: Hub\n  exits: nowhere\n").unwrap();
        let err = build_story(&doc).unwrap_err();
        assert!(matches!(
            err,
            SetupError::Structural(StructuralError::MalformedExits { .. })
        ));
    }

    #[test]
    fn test_malformed_nested_exits_fail_whole_build() {
        let doc = from_yaml_str(
            "start:\n  exits:\n    down:\n      description: Pit\n      exits: [a, b]\n",
        )
        .unwrap();
        assert!(build_story(&doc).is_err());
    }

    #[test]
    fn test_invalid_end_flag() {
        let doc = from_yaml_str("start:\n  end: maybe\n").unwrap();
        let err = build_story(&doc).unwrap_err();
        assert!(matches!(
            err,
            SetupError::Structural(StructuralError::InvalidFlag { field: "end", .. })
        ));
    }

    #[test]
    fn test_empty_source() {
        let err = build_story(&from_yaml_str("").unwrap()).unwrap_err();
        assert!(matches!(err, SetupError::EmptySource));

        let err = build_story(&from_yaml_str("~").unwrap()).unwrap_err();
        assert!(matches!(err, SetupError::EmptySource));
    }
}
