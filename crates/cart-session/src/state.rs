//! Conversation state carried between utterances.

/// A product that was asked for without a size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSlot {
    pub product_id: String,
    pub product_name: String,
    /// Quantity heard in the original request
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConversationState {
    /// Every utterance is interpreted from scratch.
    #[default]
    Idle,
    /// The next utterance that names a size completes this product.
    AwaitingSize(PendingSlot),
}

impl ConversationState {
    pub fn pending(&self) -> Option<&PendingSlot> {
        match self {
            ConversationState::Idle => None,
            ConversationState::AwaitingSize(slot) => Some(slot),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ConversationState::Idle)
    }
}
