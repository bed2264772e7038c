//! Traversal Engine - walks a player through a story graph.
//!
//! A session is a loop over one variable, the current node:
//! 1. **Enter**: Describe the node and dispatch its encounter, if any
//! 2. **End check**: A hazard outcome or an `end` node stops the session
//! 3. **Commands**: Read commands until one moves the player or quits
//!
//! All per-node side state (encounter state, claimed treasure) lives in
//! tables owned by the session and keyed by [`NodeId`].

mod command;

pub use command::*;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use story_rules::{EncounterState, Ending, NodeId, PlayerState, StoryGraph};

use crate::config::EngineConfig;
use crate::console::Console;
use crate::encounters::{
    claim_treasure, resolve_hazard, EncounterRoutine, EncounterTag, ReservedTag,
};
use crate::error::{CommandError, EngineError, Result};

/// Identifier attached to a session's log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of handling one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// The player stays on the current node.
    Stay,
    /// The player moved to a new current node.
    Moved(NodeId),
    Ended(Ending),
}

/// One playthrough of a story graph.
pub struct Session {
    id: SessionId,
    graph: StoryGraph,
    player: PlayerState,
    current: NodeId,
    encounter_states: HashMap<NodeId, EncounterState>,
    claimed_treasure: HashSet<NodeId>,
    config: EngineConfig,
}

impl Session {
    /// Start a session at the graph root.
    pub fn new(graph: StoryGraph, config: EngineConfig) -> Self {
        let current = graph.root();
        let player = PlayerState::with_gold(config.starting_gold);
        Self {
            id: SessionId::new(),
            graph,
            player,
            current,
            encounter_states: HashMap::new(),
            claimed_treasure: HashSet::new(),
            config,
        }
    }

    /// Replace the starting player.
    pub fn with_player(mut self, player: PlayerState) -> Self {
        self.player = player;
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn graph(&self) -> &StoryGraph {
        &self.graph
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    /// Encounter state stored for `node`, if its encounter has run.
    pub fn encounter_state(&self, node: NodeId) -> Option<&EncounterState> {
        self.encounter_states.get(&node)
    }

    /// Play until the session ends.
    pub fn run(&mut self, console: &mut dyn Console) -> Result<Ending> {
        tracing::info!(session = %self.id, nodes = self.graph.node_count(), "session started");
        console.say(
            "Starting game. Type a direction name (e.g. 'straight', 'left', 'right') or 'q' to quit.",
        )?;

        let ending = 'session: loop {
            if let Some(ending) = self.enter(console)? {
                break 'session ending;
            }
            self.show_exits(console)?;
            loop {
                let Some(line) = console.read_line("> ")? else {
                    break 'session Ending::InputClosed;
                };
                match self.handle_input(&line, console)? {
                    Turn::Stay => continue,
                    Turn::Moved(_) => break,
                    Turn::Ended(ending) => break 'session ending,
                }
            }
        };

        tracing::info!(session = %self.id, ?ending, gold = self.player.gold, "session ended");
        Ok(ending)
    }

    /// Describe the current node and run its encounter.
    ///
    /// Returns the ending if entering the node finished the session.
    pub fn enter(&mut self, console: &mut dyn Console) -> Result<Option<Ending>> {
        let node = self
            .graph
            .get_node(self.current)
            .ok_or(EngineError::MissingNode(self.current))?;
        tracing::debug!(session = %self.id, node = %node.id, "entering node");

        console.say("")?;
        console.say(&node.description)?;
        if !node.items.is_empty() {
            console.say(&format!("You see: {}", node.items))?;
        }

        let encounter = node.encounter.clone();
        let end = node.end;

        if let Some(tag) = encounter {
            if let Some(ending) = self.dispatch(&tag, console)? {
                return Ok(Some(ending));
            }
        }
        if end {
            console.say("This node ends the game. Exiting.")?;
            return Ok(Some(Ending::Completed));
        }
        Ok(None)
    }

    fn dispatch(&mut self, tag: &str, console: &mut dyn Console) -> Result<Option<Ending>> {
        console.say(&format!("You encounter: {tag}"))?;
        match EncounterTag::parse(tag, &self.config) {
            EncounterTag::Reserved(ReservedTag::Treasure) => {
                claim_treasure(
                    &mut self.player,
                    &mut self.claimed_treasure,
                    self.current,
                    self.config.treasure_reward,
                    console,
                )?;
                Ok(None)
            }
            EncounterTag::Reserved(ReservedTag::Hazard) => {
                let ending = resolve_hazard(&mut self.player, &self.config.hazard_item, console)?;
                Ok(Some(ending))
            }
            EncounterTag::Routine(encounter) => {
                tracing::debug!(session = %self.id, encounter = encounter.name(), node = %self.current, "dispatching encounter");
                let state = self.encounter_states.entry(self.current).or_default();
                encounter.interact(&mut self.player, state, console)?;
                Ok(None)
            }
            EncounterTag::Unknown(tag) => {
                tracing::warn!(session = %self.id, %tag, node = %self.current, "unknown encounter tag");
                Ok(None)
            }
        }
    }

    fn show_exits(&self, console: &mut dyn Console) -> Result<()> {
        let node = self
            .graph
            .get_node(self.current)
            .ok_or(EngineError::MissingNode(self.current))?;
        let exits = node.directions().collect::<Vec<_>>();
        if exits.is_empty() {
            console.say("Exits: (none)")?;
        } else {
            console.say(&format!("Exits: {}", exits.join(", ")))?;
        }
        Ok(())
    }

    /// Handle one line typed at the story prompt.
    ///
    /// Rejected commands are reported on the console and leave the player
    /// where they are.
    pub fn handle_input(&mut self, line: &str, console: &mut dyn Console) -> Result<Turn> {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(err) => {
                console.say(&err.to_string())?;
                return Ok(Turn::Stay);
            }
        };

        match command {
            Command::Quit => {
                console.say("Quitting.")?;
                Ok(Turn::Ended(Ending::Quit))
            }
            Command::Inventory => {
                console.say(&format!("Inventory: {}", self.player.describe_inventory()))?;
                Ok(Turn::Stay)
            }
            Command::Gold => {
                console.say(&format!("Gold: {}", self.player.gold))?;
                Ok(Turn::Stay)
            }
            Command::Take { item, quantity } => {
                self.take(&item, quantity, console)?;
                Ok(Turn::Stay)
            }
            Command::Go(direction) => match self.resolve_direction(&direction)? {
                Some(next) => {
                    self.current = next;
                    Ok(Turn::Moved(next))
                }
                None => {
                    console.say(&CommandError::UnknownDirection(direction).to_string())?;
                    Ok(Turn::Stay)
                }
            },
        }
    }

    fn resolve_direction(&self, direction: &str) -> Result<Option<NodeId>> {
        let node = self
            .graph
            .get_node(self.current)
            .ok_or(EngineError::MissingNode(self.current))?;
        // Labels in the source may carry capitals; input is already lowercase.
        Ok(node.exit(direction).or_else(|| {
            node.exits()
                .iter()
                .find(|exit| exit.direction.to_lowercase() == direction)
                .map(|exit| exit.target)
        }))
    }

    /// Move up to `quantity` of `item` from the current node to the player.
    fn take(&mut self, item: &str, quantity: u32, console: &mut dyn Console) -> Result<()> {
        let node = self
            .graph
            .get_node_mut(self.current)
            .ok_or(EngineError::MissingNode(self.current))?;
        // Input is lowercase; item names keep the spelling the story gave them.
        let Some(name) = node.items.resolve_name(item).map(str::to_string) else {
            console.say(&CommandError::NothingToTake(item.to_string()).to_string())?;
            return Ok(());
        };
        let taken = node.items.take_up_to(&name, quantity);
        self.player.add_item(&name, taken);
        tracing::debug!(session = %self.id, item = %name, taken, "items taken");
        console.say(&format!("You take {taken} {name}."))?;
        console.say(&format!("Inventory: {}", self.player.describe_inventory()))?;
        Ok(())
    }
}
