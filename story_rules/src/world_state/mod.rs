//! The story graph - an arena of identity-bearing story nodes.
//!
//! Nodes are addressed by [`NodeId`] handles. Two handles are the same place
//! exactly when they are equal; node content plays no part in identity. Exits
//! may point anywhere in the arena, including back at an ancestor.

use serde::{Deserialize, Serialize};

use crate::entities::Inventory;

/// Identity of a story node within its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// A labelled outgoing edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    pub direction: String,
    pub target: NodeId,
}

/// A location in the story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryNode {
    pub id: NodeId,
    pub description: String,
    /// Tag naming the encounter hosted here, if any.
    pub encounter: Option<String>,
    /// Reaching this node ends the session.
    pub end: bool,
    /// Items that can be picked up here.
    pub items: Inventory,
    exits: Vec<Exit>,
}

impl StoryNode {
    /// Create a node with only a description.
    pub fn new(id: NodeId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            encounter: None,
            end: false,
            items: Inventory::new(),
            exits: Vec::new(),
        }
    }

    /// Bind `direction` to `target`, replacing an existing binding for the
    /// same label in place.
    pub fn add_exit(&mut self, direction: impl Into<String>, target: NodeId) {
        let direction = direction.into();
        match self.exits.iter_mut().find(|exit| exit.direction == direction) {
            Some(exit) => exit.target = target,
            None => self.exits.push(Exit { direction, target }),
        }
    }

    /// Look up the node an exit label leads to.
    pub fn exit(&self, direction: &str) -> Option<NodeId> {
        self.exits
            .iter()
            .find(|exit| exit.direction == direction)
            .map(|exit| exit.target)
    }

    pub fn exits(&self) -> &[Exit] {
        &self.exits
    }

    /// Exit labels in declaration order.
    pub fn directions(&self) -> impl Iterator<Item = &str> {
        self.exits.iter().map(|exit| exit.direction.as_str())
    }
}

/// A rooted, possibly cyclic story graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryGraph {
    nodes: Vec<StoryNode>,
    root: NodeId,
}

impl StoryGraph {
    /// Create a graph holding a single root node.
    pub fn new(root_description: impl Into<String>) -> Self {
        Self {
            nodes: vec![StoryNode::new(NodeId(0), root_description)],
            root: NodeId(0),
        }
    }

    /// Create an empty graph to be filled by a builder.
    ///
    /// The graph is unusable until [`StoryGraph::set_root`] points at a node.
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            root: NodeId(0),
        }
    }

    /// Allocate a new node and return its identity.
    pub fn add_node(&mut self, description: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(StoryNode::new(id, description));
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    pub fn get_node(&self, id: NodeId) -> Option<&StoryNode> {
        self.nodes.get(id.0)
    }

    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut StoryNode> {
        self.nodes.get_mut(id.0)
    }

    /// Follow `direction` out of `from`.
    pub fn follow(&self, from: NodeId, direction: &str) -> Option<NodeId> {
        self.get_node(from).and_then(|node| node.exit(direction))
    }

    /// Follow a whole path of directions from the root.
    pub fn walk<'a>(&self, path: impl IntoIterator<Item = &'a str>) -> Option<NodeId> {
        path.into_iter()
            .try_fold(self.root, |at, direction| self.follow(at, direction))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|node| node.exits.len()).sum()
    }
}
