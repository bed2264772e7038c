//! Player commands typed at the story prompt.

use std::num::IntErrorKind;

use crate::error::CommandError;

/// A parsed prompt command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Inventory,
    Gold,
    Take { item: String, quantity: u32 },
    /// Anything else is treated as a direction label.
    Go(String),
}

impl Command {
    /// Parse one input line. Input is trimmed and lowercased first.
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let input = input.trim().to_lowercase();
        match input.as_str() {
            "q" | "quit" => return Ok(Command::Quit),
            "i" | "inventory" => return Ok(Command::Inventory),
            "gold" => return Ok(Command::Gold),
            _ => {}
        }

        let mut parts = input.split_whitespace();
        if parts.next() == Some("take") {
            let item = parts.next().ok_or(CommandError::MissingItemName)?;
            // A quantity that is not a number falls back to one; one too
            // large to count saturates and takes everything available.
            let quantity = match parts.next().map(str::parse::<u32>) {
                Some(Ok(0)) => return Err(CommandError::InvalidQuantity(0)),
                Some(Ok(n)) => n,
                Some(Err(err)) if *err.kind() == IntErrorKind::PosOverflow => u32::MAX,
                Some(Err(_)) | None => 1,
            };
            return Ok(Command::Take {
                item: item.to_string(),
                quantity,
            });
        }

        Ok(Command::Go(input))
    }
}
