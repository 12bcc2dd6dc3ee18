//! Intent Parser for Spoken Shopping Commands
//!
//! This crate turns speech transcriptions (or typed text) into structured
//! shopping commands: which action was asked for, which catalog product it
//! targets, and the requested size and quantity.

mod actions;
mod catalog;
mod entities;
mod error;
mod normalize;
mod parser;

pub use actions::{CommandAction, KeywordSet, ACTION_PRECEDENCE};
pub use catalog::{load_catalog_file, CardAnchor, Catalog, Product};
pub use entities::{extract_quantity, parse_size, Size};
pub use error::{IntentError, Result};
pub use normalize::{normalize, tokens};
pub use parser::{
    is_clear_cart_command, size_needed_intent, targeting_intent, Command, IntentParser,
    SIZE_REPROMPT, UNKNOWN_OBJECT, WAITING_FOR_PRODUCT,
};

/// Initialize the intent parser system
pub fn init() -> Result<()> {
    tracing::info!("Initializing Intent Parser system");
    Ok(())
}

/// Parse a command against the built-in catalog
pub fn parse_command(text: &str) -> Command {
    IntentParser::default().parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_commands() {
        let test_cases = vec![
            ("add to cart the stadium mesh pants", CommandAction::AddToCart),
            ("buy two cargo shorts in small", CommandAction::AddToCart),
            ("open size guide for studio cargo shorts", CommandAction::OpenSizeGuide),
            ("remove the velocity track jacket", CommandAction::Delete),
            ("clear cart", CommandAction::Delete),
            ("good morning", CommandAction::Unknown),
        ];

        for (command, expected) in test_cases {
            let result = parse_command(command);
            assert_eq!(result.action, expected, "'{}'", command);
        }
    }

    #[test]
    fn test_parse_is_deterministic_apart_from_id() {
        let a = parse_command("add to cart the velocity track jacket size medium");
        let b = parse_command("add to cart the velocity track jacket size medium");
        assert_ne!(a.id, b.id);
        assert_eq!(Command { id: b.id.clone(), ..a }, b);
    }
}
