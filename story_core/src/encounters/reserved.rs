//! Reserved encounters resolved by the session: treasure and hazards.

use std::collections::HashSet;

use story_rules::{Ending, NodeId, PlayerState};

use super::item_label;
use crate::console::Console;
use crate::error::Result;

/// Grant `reward` the first time `node` is encountered; later visits get nothing.
///
/// Returns whether the reward was granted.
pub fn claim_treasure(
    player: &mut PlayerState,
    claimed: &mut HashSet<NodeId>,
    node: NodeId,
    reward: i64,
    console: &mut dyn Console,
) -> Result<bool> {
    if !claimed.insert(node) {
        console.say("Only an empty pot remains.")?;
        return Ok(false);
    }
    player.add_gold(reward);
    tracing::debug!(%node, reward, "treasure claimed");
    console.say(&format!("You found a pot of gold! You get {reward} gold."))?;
    console.say(&format!("Inventory: {}", player.describe_inventory()))?;
    Ok(true)
}

/// Resolve a hazard. Holding `item` means victory (one unit is used up);
/// otherwise the player is defeated. Either way the session ends.
pub fn resolve_hazard(
    player: &mut PlayerState,
    item: &str,
    console: &mut dyn Console,
) -> Result<Ending> {
    if player.remove_item(item, 1) {
        console.say(&format!(
            "You use the {} to put out the flames. You survive and win!",
            item_label(item)
        ))?;
        Ok(Ending::Victory)
    } else {
        console.say("The flames scorch you. This is the end.")?;
        Ok(Ending::Defeat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    #[test]
    fn test_treasure_claimed_once_per_node() {
        let mut player = PlayerState::new();
        let mut claimed = HashSet::new();
        let mut console = ScriptedConsole::default();

        assert!(claim_treasure(&mut player, &mut claimed, NodeId(3), 50, &mut console).unwrap());
        assert!(!claim_treasure(&mut player, &mut claimed, NodeId(3), 50, &mut console).unwrap());
        assert_eq!(player.gold, 50);

        assert!(claim_treasure(&mut player, &mut claimed, NodeId(4), 50, &mut console).unwrap());
        assert_eq!(player.gold, 100);
    }

    #[test]
    fn test_hazard_with_item_is_victory() {
        let mut player = PlayerState::new();
        player.add_item("fire_extinguisher", 1);
        let mut console = ScriptedConsole::default();

        let ending = resolve_hazard(&mut player, "fire_extinguisher", &mut console).unwrap();
        assert_eq!(ending, Ending::Victory);
        assert!(!player.has_item("fire_extinguisher"));
        assert!(console.said("You survive and win!"));
    }

    #[test]
    fn test_hazard_without_item_is_defeat() {
        let mut player = PlayerState::with_gold(100);
        let mut console = ScriptedConsole::default();

        let ending = resolve_hazard(&mut player, "fire_extinguisher", &mut console).unwrap();
        assert_eq!(ending, Ending::Defeat);
        assert_eq!(player.gold, 100);
        assert!(console.said("This is the end."));
    }
}
