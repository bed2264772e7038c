//! Component definitions shared by the player and story nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stack of identical items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub name: String,
    pub quantity: u32,
}

impl ItemStack {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// An insertion-ordered bag of item stacks.
///
/// Every stored stack has a positive quantity; a stack whose quantity drops
/// to zero is removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<ItemStack>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of `name`, creating the stack if needed.
    pub fn add(&mut self, name: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.items.iter_mut().find(|stack| stack.name == name) {
            Some(stack) => stack.quantity = stack.quantity.saturating_add(quantity),
            None => self.items.push(ItemStack::new(name, quantity)),
        }
    }

    /// Remove exactly `quantity` units of `name`.
    ///
    /// Returns `false` and leaves the inventory untouched when fewer than
    /// `quantity` units are held.
    pub fn remove(&mut self, name: &str, quantity: u32) -> bool {
        let Some(index) = self.position(name) else {
            return quantity == 0;
        };
        let stack = &mut self.items[index];
        if stack.quantity < quantity {
            return false;
        }
        stack.quantity -= quantity;
        if stack.quantity == 0 {
            self.items.remove(index);
        }
        true
    }

    /// Remove up to `quantity` units of `name` and return how many were removed.
    pub fn take_up_to(&mut self, name: &str, quantity: u32) -> u32 {
        let taken = self.count(name).min(quantity);
        if taken > 0 {
            self.remove(name, taken);
        }
        taken
    }

    /// Number of units of `name` held (zero when absent).
    pub fn count(&self, name: &str) -> u32 {
        self.items
            .iter()
            .find(|stack| stack.name == name)
            .map(|stack| stack.quantity)
            .unwrap_or(0)
    }

    /// Stored spelling of `name`: an exact match first, then a match
    /// ignoring case.
    pub fn resolve_name(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|stack| stack.name == name)
            .or_else(|| {
                self.items
                    .iter()
                    .find(|stack| stack.name.to_lowercase() == name.to_lowercase())
            })
            .map(|stack| stack.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.count(name) > 0
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate stacks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemStack> {
        self.items.iter()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|stack| stack.name == name)
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stack) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", stack.name, stack.quantity)?;
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut inventory = Inventory::new();
        for (name, quantity) in iter {
            let name = name.into();
            inventory.add(&name, quantity);
        }
        inventory
    }
}
