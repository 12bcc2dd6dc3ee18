//! Cart and Conversation State for Voice Shopping
//!
//! A [`VoiceSession`] owns one shopper's cart, action log and pending size
//! slot. Utterances are processed one at a time: an optional remote transcript
//! cleanup, local parsing, an optional remote product match, then the cart
//! mutation and toasts. [`SessionHandle`] shares a session across tasks.

mod cart;
mod error;
mod handle;
mod log;
mod session;
mod state;
mod types;

pub use cart::{Cart, LineItem, Removal};
pub use error::{CartError, Result};
pub use handle::SessionHandle;
pub use log::{ActionLog, LogEntry};
pub use session::{VoiceSession, CART_CLEARED, CART_EMPTY, CHECKOUT_FAILED, PICK_A_SIZE};
pub use state::{ConversationState, PendingSlot};
pub use types::{CheckoutOutcome, SessionConfig, SessionSnapshot, SpeechEvent, Turn};

/// Initialize the cart session system
pub fn init() -> Result<()> {
    tracing::info!("Initializing Cart Session system");
    Ok(())
}

/// Format cents as a "$12.34" price.
pub fn format_cents(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}
