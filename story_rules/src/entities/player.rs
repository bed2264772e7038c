//! Player state.

use serde::{Deserialize, Serialize};

use super::Inventory;

/// Gold and inventory for the one player of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub gold: i64,
    pub inventory: Inventory,
}

impl PlayerState {
    /// Create a player with no gold and an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a player starting with the given amount of gold.
    pub fn with_gold(gold: i64) -> Self {
        Self {
            gold,
            ..Self::default()
        }
    }

    /// Adjust gold by `delta`.
    ///
    /// There is no floor here: spending sites must check `can_afford` first.
    pub fn add_gold(&mut self, delta: i64) {
        self.gold += delta;
    }

    pub fn can_afford(&self, price: i64) -> bool {
        self.gold >= price
    }

    pub fn add_item(&mut self, name: &str, quantity: u32) {
        self.inventory.add(name, quantity);
    }

    /// Remove `quantity` units; `false` with no change when not enough are held.
    pub fn remove_item(&mut self, name: &str, quantity: u32) -> bool {
        self.inventory.remove(name, quantity)
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.inventory.contains(name)
    }

    pub fn item_count(&self, name: &str) -> u32 {
        self.inventory.count(name)
    }

    /// Human-readable summary, gold first, then items in the order acquired.
    pub fn describe_inventory(&self) -> String {
        if self.inventory.is_empty() {
            format!("gold: {}", self.gold)
        } else {
            format!("gold: {}, {}", self.gold, self.inventory)
        }
    }
}
