//! The ghoul: a silent shopkeeper that only talks after being asked enough
//! times in a row.

use story_rules::{EncounterState, PlayerState};

use super::{item_label, EncounterRoutine};
use crate::config::GhoulConfig;
use crate::console::Console;
use crate::error::{CommandError, Result};

/// State key: asks since the last greeting.
pub const CONSECUTIVE_ASKS: &str = "consecutive_asks";
/// State key: whether the ghoul has revealed its wares.
pub const REVEALED: &str = "revealed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GhoulAction {
    Ask,
    Greet,
    Leave,
}

impl GhoulAction {
    fn parse(input: &str) -> std::result::Result<Self, CommandError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "1" | "ask" => Ok(GhoulAction::Ask),
            "2" | "greet" | "hello" => Ok(GhoulAction::Greet),
            "3" | "leave" => Ok(GhoulAction::Leave),
            _ => Err(CommandError::UnknownAction("Choose 1, 2 or 3.".to_string())),
        }
    }
}

/// Dialogue with the ghoul, parameterised by its shop settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhoulEncounter {
    config: GhoulConfig,
}

impl Default for GhoulEncounter {
    fn default() -> Self {
        Self::new(GhoulConfig::default())
    }
}

impl GhoulEncounter {
    pub fn new(config: GhoulConfig) -> Self {
        Self { config }
    }

    /// Offer the revealed item once. Spending is only done after checking funds.
    fn offer(&self, player: &mut PlayerState, console: &mut dyn Console) -> Result<()> {
        let label = item_label(&self.config.item);
        console.say(&format!(
            "Do you want to buy the {label} for {} gold? (y/n)",
            self.config.price
        ))?;
        let answer = console.read_line("> ")?.unwrap_or_default();
        if !matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
            console.say("The ghoul turns away.")?;
            return Ok(());
        }

        if !player.can_afford(self.config.price) {
            let err = CommandError::InsufficientGold {
                needed: self.config.price,
                available: player.gold,
            };
            console.say(&err.to_string())?;
            return Ok(());
        }

        player.add_gold(-self.config.price);
        player.add_item(&self.config.item, 1);
        tracing::debug!(item = %self.config.item, price = self.config.price, "ghoul sale");
        console.say(&format!("You bought the {label}."))?;
        console.say(&format!("Inventory: {}", player.describe_inventory()))?;
        Ok(())
    }
}

impl EncounterRoutine for GhoulEncounter {
    fn interact(
        &self,
        player: &mut PlayerState,
        state: &mut EncounterState,
        console: &mut dyn Console,
    ) -> Result<()> {
        state.set_default(CONSECUTIVE_ASKS, 0u64);
        state.set_default(REVEALED, false);

        loop {
            console.say("")?;
            console.say("A ghoul hangs above. What do you do?")?;
            console.say("1) Ask 'what is for sale?'")?;
            console.say("2) Say hello")?;
            console.say("3) Leave")?;

            let Some(line) = console.read_line("(1/2/3) > ")? else {
                console.say("You step away from the ghoul.")?;
                return Ok(());
            };

            match GhoulAction::parse(&line) {
                Err(err) => {
                    console.say(&err.to_string())?;
                    continue;
                }
                Ok(GhoulAction::Leave) => {
                    console.say("You step away from the ghoul.")?;
                    return Ok(());
                }
                Ok(GhoulAction::Ask) => {
                    let asks = state.get_u64(CONSECUTIVE_ASKS, 0) + 1;
                    state.set(CONSECUTIVE_ASKS, asks);
                    console.say("You ask: 'What is for sale?'")?;

                    let revealed = state.get_bool(REVEALED, false);
                    if asks >= self.config.asks_to_reveal && !revealed {
                        state.set(REVEALED, true);
                        tracing::debug!(asks, "ghoul revealed its wares");
                        console.say(&format!(
                            "The ghoul finally speaks: 'Fine. I have a {} for sale.'",
                            item_label(&self.config.item)
                        ))?;
                    } else if !revealed {
                        console.say("The ghoul remains silent.")?;
                    }
                }
                Ok(GhoulAction::Greet) => {
                    state.set(CONSECUTIVE_ASKS, 0u64);
                    console.say("You say hello. The ghoul stares.")?;
                }
            }

            // Once revealed, the first ask or greet ends with the offer.
            if state.get_bool(REVEALED, false) {
                self.offer(player, console)?;
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    const OFFER: &str = "Do you want to buy";

    fn run(player: &mut PlayerState, state: &mut EncounterState, inputs: &[&str]) -> ScriptedConsole {
        let mut console = ScriptedConsole::new(inputs.iter().copied());
        GhoulEncounter::default()
            .interact(player, state, &mut console)
            .unwrap();
        console
    }

    #[test]
    fn test_three_asks_reveal_and_offer_once() {
        let mut player = PlayerState::new();
        let mut state = EncounterState::new();
        let console = run(&mut player, &mut state, &["1", "1", "1", "n"]);

        assert!(state.get_bool(REVEALED, false));
        assert_eq!(state.get_u64(CONSECUTIVE_ASKS, 0), 3);
        assert_eq!(console.count_said("The ghoul remains silent."), 2);
        assert_eq!(console.count_said("finally speaks"), 1);
        assert_eq!(console.count_said(OFFER), 1);
        assert_eq!(console.remaining(), 0);
    }

    #[test]
    fn test_greet_resets_consecutive_asks() {
        let mut player = PlayerState::new();
        let mut state = EncounterState::new();
        let console = run(&mut player, &mut state, &["1", "1", "2", "1", "1", "3"]);

        assert!(!state.get_bool(REVEALED, false));
        assert_eq!(state.get_u64(CONSECUTIVE_ASKS, 0), 2);
        assert!(!console.said(OFFER));

        // The count carries over to the next visit of the same node.
        let console = run(&mut player, &mut state, &["ask", "n"]);
        assert!(state.get_bool(REVEALED, false));
        assert!(console.said("finally speaks"));
        assert_eq!(console.count_said(OFFER), 1);
    }

    #[test]
    fn test_purchase_with_enough_gold() {
        let mut player = PlayerState::with_gold(25);
        let mut state = EncounterState::new();
        let console = run(&mut player, &mut state, &["1", "1", "1", "y"]);

        assert_eq!(player.gold, 5);
        assert_eq!(player.item_count("fire_extinguisher"), 1);
        assert!(console.said("You bought the fire extinguisher."));
    }

    #[test]
    fn test_purchase_without_enough_gold() {
        let mut player = PlayerState::with_gold(10);
        let mut state = EncounterState::new();
        let console = run(&mut player, &mut state, &["1", "1", "1", "y"]);

        assert_eq!(player.gold, 10);
        assert!(!player.has_item("fire_extinguisher"));
        assert!(console.said("You don't have enough gold"));
    }

    #[test]
    fn test_revealed_ghoul_offers_on_first_action() {
        let mut player = PlayerState::with_gold(40);
        let mut state = EncounterState::new();
        state.set(REVEALED, true);
        state.set(CONSECUTIVE_ASKS, 5u64);

        let console = run(&mut player, &mut state, &["2", "y", "1"]);
        assert_eq!(state.get_u64(CONSECUTIVE_ASKS, 9), 0);
        assert_eq!(console.count_said(OFFER), 1);
        assert!(!console.said("finally speaks"));
        assert_eq!(player.gold, 20);
        // The trailing "1" is never read: the dispatch ended after the offer.
        assert_eq!(console.remaining(), 1);
    }

    #[test]
    fn test_reasking_after_reveal_has_no_narrative_effect() {
        let mut player = PlayerState::new();
        let mut state = EncounterState::new();
        state.set(REVEALED, true);

        let console = run(&mut player, &mut state, &["1", "n"]);
        assert!(!console.said("finally speaks"));
        assert!(!console.said("remains silent"));
        assert_eq!(console.count_said(OFFER), 1);
    }

    #[test]
    fn test_invalid_choice_reprompts_without_offer() {
        let mut player = PlayerState::new();
        let mut state = EncounterState::new();
        state.set(REVEALED, true);

        let console = run(&mut player, &mut state, &["dance", "3"]);
        assert!(console.said("Choose 1, 2 or 3."));
        assert!(!console.said(OFFER));
        assert!(console.said("You step away from the ghoul."));
    }

    #[test]
    fn test_leave_immediately() {
        let mut player = PlayerState::new();
        let mut state = EncounterState::new();
        let console = run(&mut player, &mut state, &["3", "1"]);

        assert_eq!(console.remaining(), 1);
        assert_eq!(state.get_u64(CONSECUTIVE_ASKS, 9), 0);
        assert!(!state.get_bool(REVEALED, true));
    }

    #[test]
    fn test_end_of_input_leaves() {
        let mut player = PlayerState::new();
        let mut state = EncounterState::new();
        let console = run(&mut player, &mut state, &["1"]);
        assert!(console.said("You step away from the ghoul."));
        assert_eq!(state.get_u64(CONSECUTIVE_ASKS, 0), 1);
    }
}
