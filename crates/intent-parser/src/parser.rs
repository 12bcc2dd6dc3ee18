//! Command parser for spoken shopping instructions

use crate::entities::parse_size;
use crate::normalize::{normalize, tokens};
use crate::{Catalog, CommandAction, Product, Size};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Object name used when no product was resolved.
pub const UNKNOWN_OBJECT: &str = "Unknown item";
/// Intent shown before any product is matched.
pub const WAITING_FOR_PRODUCT: &str = "Waiting for a product match";
/// Status used when an add-to-cart lacks a size.
pub const SIZE_REPROMPT: &str = "Size missing — say a size (e.g., small, medium, large).";

const EMPTY_TRANSCRIPT: &str = "Waiting for input";

/// Substrings that count as "some action was said" when judging transcript quality.
const ACTION_HINTS: &[&str] = &["add", "buy", "purchase", "size", "delete", "remove"];
/// Tokens the recognizer tends to produce from background noise.
const NOISE_TOKENS: &[&str] = &["back", "smash"];

/// One interpreted utterance. Never mutated; derive a new one instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub id: String,
    pub transcript: String,
    pub action: CommandAction,
    /// Product display name, or [`UNKNOWN_OBJECT`]
    pub object: String,
    pub intent: String,
    pub target_id: Option<String>,
    pub status: String,
    pub size: Option<Size>,
}

impl Command {
    /// An add-to-cart for a known product and size.
    pub fn add_to_cart(transcript: &str, product: &Product, size: Size) -> Self {
        Self {
            id: next_command_id(),
            transcript: display_transcript(transcript),
            action: CommandAction::AddToCart,
            object: product.name.clone(),
            intent: targeting_intent(&product.name, Some(size)),
            target_id: Some(product.id.clone()),
            status: CommandAction::AddToCart.status().to_string(),
            size: Some(size),
        }
    }

    /// The reprompt shown while a product is waiting for its size.
    pub fn size_reprompt(transcript: &str, product_id: &str, product_name: &str) -> Self {
        Self {
            id: next_command_id(),
            transcript: display_transcript(transcript),
            action: CommandAction::AddToCart,
            object: product_name.to_string(),
            intent: size_needed_intent(product_name),
            target_id: Some(product_id.to_string()),
            status: SIZE_REPROMPT.to_string(),
            size: None,
        }
    }

    /// Same command aimed at `product`.
    pub fn retarget(&self, product: &Product) -> Self {
        Self {
            id: next_command_id(),
            object: product.name.clone(),
            intent: targeting_intent(&product.name, self.size),
            target_id: Some(product.id.clone()),
            ..self.clone()
        }
    }

    /// Same command with the size reprompt status.
    pub fn awaiting_size(&self) -> Self {
        Self {
            id: next_command_id(),
            intent: size_needed_intent(&self.object),
            status: SIZE_REPROMPT.to_string(),
            ..self.clone()
        }
    }
}

pub fn targeting_intent(name: &str, size: Option<Size>) -> String {
    match size {
        Some(size) => format!("Targeting the {name} card (Size: {size})"),
        None => format!("Targeting the {name} card"),
    }
}

pub fn size_needed_intent(name: &str) -> String {
    format!("Targeting the {name} card (Size needed)")
}

fn display_transcript(raw: &str) -> String {
    if raw.is_empty() {
        EMPTY_TRANSCRIPT.to_string()
    } else {
        raw.to_string()
    }
}

fn next_command_id() -> String {
    format!("cmd-{}", uuid::Uuid::new_v4())
}

/// True for "clear cart" / "empty cart" requests.
pub fn is_clear_cart_command(text: &str) -> bool {
    let normalized = normalize(text);
    normalized.contains("clear cart") || normalized.contains("empty cart")
}

/// Main intent parser
#[derive(Debug, Clone)]
pub struct IntentParser {
    catalog: Arc<Catalog>,
}

impl IntentParser {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Parse a raw utterance into a [`Command`]. Pure with respect to the catalog.
    pub fn parse(&self, raw: &str) -> Command {
        let normalized = normalize(raw);
        let words = tokens(&normalized);

        let product = self.catalog.match_product(&normalized);
        let action = CommandAction::classify(&normalized, &words);
        let size = parse_size(raw);

        let intent = match product {
            Some(p) => targeting_intent(&p.name, size),
            None => WAITING_FOR_PRODUCT.to_string(),
        };

        tracing::debug!(
            action = action.as_str(),
            product = product.map(|p| p.id.as_str()),
            size = size.map(|s| s.code()),
            "parsed utterance"
        );

        Command {
            id: next_command_id(),
            transcript: display_transcript(raw),
            action,
            object: product
                .map(|p| p.name.clone())
                .unwrap_or_else(|| UNKNOWN_OBJECT.to_string()),
            intent,
            target_id: product.map(|p| p.id.clone()),
            status: action.status().to_string(),
            size,
        }
    }

    /// Heuristic for noisy speech-to-text output that is worth a remote cleanup:
    /// very short, missing an action hint or product token, or carrying noise tokens.
    pub fn is_messy(&self, raw: &str) -> bool {
        let normalized = normalize(raw);
        let words = tokens(&normalized);
        if words.len() <= 2 {
            return true;
        }
        let has_action = ACTION_HINTS.iter().any(|hint| normalized.contains(hint));
        let has_product = self.catalog.mentions_alias_token(&words);
        if !has_action || !has_product {
            return true;
        }
        NOISE_TOKENS.iter().any(|noise| words.contains(noise))
    }
}

impl Default for IntentParser {
    fn default() -> Self {
        Self::new(Arc::new(Catalog::builtin()))
    }
}
