//! Shopping actions and the keyword sets that select them

use serde::{Deserialize, Serialize};
use std::fmt;

/// Action resolved from an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    /// Put the targeted product into the cart
    AddToCart,
    /// Show the size guide for the targeted product
    OpenSizeGuide,
    /// Remove the targeted product, or clear the cart when nothing is targeted
    Delete,
    /// Nothing recognized
    Unknown,
}

/// Order in which keyword sets are consulted. The first set that matches wins.
pub const ACTION_PRECEDENCE: [CommandAction; 3] = [
    CommandAction::AddToCart,
    CommandAction::OpenSizeGuide,
    CommandAction::Delete,
];

/// Keywords for one action. `phrases` are substring tests on the normalized text,
/// `tokens` must appear as whole tokens.
#[derive(Debug, Clone, Copy)]
pub struct KeywordSet {
    pub phrases: &'static [&'static str],
    pub tokens: &'static [&'static str],
}

const ADD_KEYWORDS: KeywordSet = KeywordSet {
    phrases: &["add to cart", "add to bag"],
    tokens: &["add", "buy", "purchase", "added"],
};

const SIZE_GUIDE_KEYWORDS: KeywordSet = KeywordSet {
    phrases: &["size guide", "size chart"],
    tokens: &["sizing"],
};

// "remove ... from ... cart" is covered by the "remove" phrase.
const DELETE_KEYWORDS: KeywordSet = KeywordSet {
    phrases: &["delete", "remove", "clear"],
    tokens: &[],
};

impl KeywordSet {
    pub fn matches(&self, normalized: &str, tokens: &[&str]) -> bool {
        self.phrases.iter().any(|p| normalized.contains(p))
            || self.tokens.iter().any(|t| tokens.contains(t))
    }
}

impl CommandAction {
    /// Wire/log name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandAction::AddToCart => "add_to_cart",
            CommandAction::OpenSizeGuide => "open_size_guide",
            CommandAction::Delete => "delete",
            CommandAction::Unknown => "unknown",
        }
    }

    /// Status line shown once the action is recognized.
    pub fn status(&self) -> &'static str {
        match self {
            CommandAction::AddToCart => "Queued click on Add to Cart",
            CommandAction::OpenSizeGuide => "Preparing size guide modal",
            CommandAction::Delete => "Removing item from cart",
            CommandAction::Unknown => "No matching action detected",
        }
    }

    pub fn keywords(&self) -> Option<KeywordSet> {
        match self {
            CommandAction::AddToCart => Some(ADD_KEYWORDS),
            CommandAction::OpenSizeGuide => Some(SIZE_GUIDE_KEYWORDS),
            CommandAction::Delete => Some(DELETE_KEYWORDS),
            CommandAction::Unknown => None,
        }
    }

    /// Whether the action operates on a specific product.
    pub fn needs_product(&self) -> bool {
        !matches!(self, CommandAction::Unknown)
    }

    /// Classify normalized text, honoring [`ACTION_PRECEDENCE`].
    pub fn classify(normalized: &str, tokens: &[&str]) -> Self {
        ACTION_PRECEDENCE
            .into_iter()
            .find(|action| {
                action
                    .keywords()
                    .is_some_and(|k| k.matches(normalized, tokens))
            })
            .unwrap_or(CommandAction::Unknown)
    }
}

impl fmt::Display for CommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
