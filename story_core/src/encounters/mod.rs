//! Encounter Protocol - stateful routines hosted by story nodes.
//!
//! Every interactive routine implements [`EncounterRoutine`]: it receives the
//! shared player and the [`EncounterState`] belonging to the node being
//! visited, and runs its own prompt loop until it decides to hand control
//! back. The session keeps one state per node identity, so progress survives
//! leaving and coming back.
//!
//! Tags are classified by [`EncounterTag::parse`]:
//! - **Reserved** tags (`treasure`, `hazard`) are resolved by the session
//! - **Routine** tags map onto a variant of the closed [`Encounter`] enum
//! - anything else is **Unknown** and ignored

mod ghoul;
mod reserved;

pub use ghoul::*;
pub use reserved::*;

use story_rules::{EncounterState, PlayerState};

use crate::config::EngineConfig;
use crate::console::Console;
use crate::error::Result;

/// The contract every interactive encounter satisfies.
pub trait EncounterRoutine {
    /// Run the encounter to its own exit point.
    fn interact(
        &self,
        player: &mut PlayerState,
        state: &mut EncounterState,
        console: &mut dyn Console,
    ) -> Result<()>;
}

/// All interactive encounters the engine knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encounter {
    Ghoul(GhoulEncounter),
}

impl Encounter {
    pub fn name(&self) -> &'static str {
        match self {
            Encounter::Ghoul(_) => "ghoul",
        }
    }
}

impl EncounterRoutine for Encounter {
    fn interact(
        &self,
        player: &mut PlayerState,
        state: &mut EncounterState,
        console: &mut dyn Console,
    ) -> Result<()> {
        match self {
            Encounter::Ghoul(ghoul) => ghoul.interact(player, state, console),
        }
    }
}

/// Encounters the session resolves itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedTag {
    /// One-time gold reward per node.
    Treasure,
    /// Survived only by spending the hazard item.
    Hazard,
}

/// What a node's encounter tag refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncounterTag {
    Reserved(ReservedTag),
    Routine(Encounter),
    Unknown(String),
}

impl EncounterTag {
    pub fn parse(tag: &str, config: &EngineConfig) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "treasure" | "pot_of_gold" => EncounterTag::Reserved(ReservedTag::Treasure),
            "hazard" | "fire" => EncounterTag::Reserved(ReservedTag::Hazard),
            "ghoul" => EncounterTag::Routine(Encounter::Ghoul(GhoulEncounter::new(
                config.ghoul.clone(),
            ))),
            _ => EncounterTag::Unknown(tag.to_string()),
        }
    }
}

/// Turn an item id like `fire_extinguisher` into display text.
pub(crate) fn item_label(item: &str) -> String {
    item.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reserved_tags() {
        let config = EngineConfig::default();
        assert_eq!(
            EncounterTag::parse("pot_of_gold", &config),
            EncounterTag::Reserved(ReservedTag::Treasure)
        );
        assert_eq!(
            EncounterTag::parse("Treasure", &config),
            EncounterTag::Reserved(ReservedTag::Treasure)
        );
        assert_eq!(
            EncounterTag::parse("fire", &config),
            EncounterTag::Reserved(ReservedTag::Hazard)
        );
    }

    #[test]
    fn test_parse_routine_and_unknown() {
        let config = EngineConfig::default();
        match EncounterTag::parse("ghoul", &config) {
            EncounterTag::Routine(encounter) => assert_eq!(encounter.name(), "ghoul"),
            other => panic!("unexpected tag {other:?}"),
        }
        assert_eq!(
            EncounterTag::parse("dragon", &config),
            EncounterTag::Unknown("dragon".to_string())
        );
    }

    #[test]
    fn test_item_label() {
        assert_eq!(item_label("fire_extinguisher"), "fire extinguisher");
    }
}
