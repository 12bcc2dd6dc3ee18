//! One shopper's conversation: transcript cleanup, parsing, remote product
//! matching, size slot-filling and cart mutation, one utterance at a time.

use crate::{
    ActionLog, Cart, CartError, CheckoutOutcome, ConversationState, PendingSlot, Result, SessionConfig,
    SessionSnapshot, SpeechEvent, Turn,
};
use intent_parser::{
    extract_quantity, is_clear_cart_command, parse_size, Catalog, Command, CommandAction,
    IntentParser, Product, Size,
};
use shop_services::{CheckoutClient, Disambiguator, MatchCandidate, RemoteOutcome};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const PICK_A_SIZE: &str = "Pick a size to continue";
pub const CART_CLEARED: &str = "Cart cleared";
pub const CART_EMPTY: &str = "Cart is empty";
pub const CHECKOUT_FAILED: &str = "Checkout failed";

pub struct VoiceSession {
    parser: IntentParser,
    candidates: Vec<MatchCandidate>,
    remote: Arc<dyn Disambiguator>,
    checkout: Option<Arc<dyn CheckoutClient>>,
    cart: Cart,
    state: ConversationState,
    log: ActionLog,
    current: Option<Command>,
    interim: Option<String>,
}

impl VoiceSession {
    pub fn new(catalog: Arc<Catalog>, remote: Arc<dyn Disambiguator>, config: SessionConfig) -> Self {
        let candidates = catalog
            .products()
            .iter()
            .map(|p| MatchCandidate {
                id: p.id.clone(),
                text: p.embedding_text(),
            })
            .collect();
        Self {
            parser: IntentParser::new(catalog),
            candidates,
            remote,
            checkout: None,
            cart: Cart::new(),
            state: ConversationState::Idle,
            log: ActionLog::new(config.log_capacity),
            current: None,
            interim: None,
        }
    }

    pub fn with_checkout(mut self, client: Arc<dyn CheckoutClient>) -> Self {
        self.checkout = Some(client);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        self.parser.catalog()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    pub fn product(&self, product_id: &str) -> Result<&Product> {
        self.parser
            .catalog()
            .get(product_id)
            .ok_or_else(|| CartError::UnknownProduct(product_id.to_string()))
    }

    pub fn current_command(&self) -> Option<&Command> {
        self.current.as_ref()
    }

    /// Interpret one final utterance. Blank input is ignored.
    pub async fn submit(&mut self, utterance: &str) -> Option<Turn> {
        let raw = utterance.trim();
        if raw.is_empty() {
            return None;
        }
        self.interim = None;
        let mut toasts = Vec::new();
        let command = match self.state.clone() {
            ConversationState::Idle => self.interpret(raw, &mut toasts).await,
            ConversationState::AwaitingSize(slot) => self.fill_size(slot, raw, &mut toasts).await,
        };
        self.current = Some(command.clone());
        Some(Turn { command, toasts })
    }

    /// Feed a recognizer event; interim text only updates the displayed transcript.
    pub async fn on_speech(&mut self, event: SpeechEvent) -> Option<Turn> {
        match event {
            SpeechEvent::Interim(text) => {
                self.interim = Some(text);
                None
            }
            SpeechEvent::Final(text) => self.submit(&text).await,
        }
    }

    /// Transcript to display: the live interim text, else the last command's.
    pub fn display_transcript(&self) -> Option<&str> {
        self.interim
            .as_deref()
            .or_else(|| self.current.as_ref().map(|c| c.transcript.as_str()))
    }

    async fn clean(&self, raw: &str) -> String {
        if !self.parser.is_messy(raw) {
            return raw.to_string();
        }
        match self.remote.clean_transcript(raw).await {
            RemoteOutcome::Resolved(cleaned) => {
                debug!(raw, cleaned = cleaned.as_str(), "transcript cleaned");
                cleaned
            }
            RemoteOutcome::Unavailable => raw.to_string(),
        }
    }

    async fn interpret(&mut self, raw: &str, toasts: &mut Vec<String>) -> Command {
        // clear-cart requests are unambiguous; keep them off the network entirely
        let input = if is_clear_cart_command(raw) {
            raw.to_string()
        } else {
            self.clean(raw).await
        };
        let mut command = self.parser.parse(&input);

        if command.action.needs_product()
            && command.target_id.is_none()
            && !is_clear_cart_command(&input)
        {
            command = self.resolve_remotely(command, &input).await;
        }

        self.log.record(&command);
        let quantity = extract_quantity(&input);

        match command.action {
            CommandAction::AddToCart => self.add(command, quantity, toasts),
            CommandAction::OpenSizeGuide => {
                if command.target_id.is_some() {
                    toasts.push(format!("Opening size guide for {}", command.object));
                }
                command
            }
            CommandAction::Delete => {
                self.delete(&command, &input, quantity, toasts);
                command
            }
            CommandAction::Unknown => command,
        }
    }

    async fn resolve_remotely(&self, command: Command, input: &str) -> Command {
        match self.remote.match_product(input, &self.candidates).await {
            RemoteOutcome::Resolved(id) => match self.parser.catalog().get(&id) {
                Some(product) => {
                    debug!(
                        product = product.id.as_str(),
                        backend = self.remote.name(),
                        "product resolved remotely"
                    );
                    command.retarget(product)
                }
                None => {
                    warn!("remote match returned unknown product {}", id);
                    command
                }
            },
            RemoteOutcome::Unavailable => command,
        }
    }

    async fn fill_size(
        &mut self,
        slot: PendingSlot,
        raw: &str,
        toasts: &mut Vec<String>,
    ) -> Command {
        let mut input = raw.to_string();
        let mut size = parse_size(raw);
        if size.is_none() {
            input = self.clean(raw).await;
            size = parse_size(&input);
        }

        let Some(size) = size else {
            debug!(product = slot.product_id.as_str(), "still awaiting size");
            toasts.push(PICK_A_SIZE.to_string());
            return Command::size_reprompt(&input, &slot.product_id, &slot.product_name);
        };

        let Some(product) = self.parser.catalog().get(&slot.product_id).cloned() else {
            warn!("pending product {} is not in the catalog", slot.product_id);
            self.state = ConversationState::Idle;
            return self.interpret(raw, toasts).await;
        };

        let heard = extract_quantity(&input);
        let quantity = if heard == 1 { slot.quantity } else { heard };
        let command = Command::add_to_cart(&input, &product, size);
        self.log.record(&command);
        self.put_in_cart(&product, size, quantity, toasts);
        self.state = ConversationState::Idle;
        command
    }

    fn add(&mut self, command: Command, quantity: u32, toasts: &mut Vec<String>) -> Command {
        let Some(product) = command
            .target_id
            .as_deref()
            .and_then(|id| self.parser.catalog().get(id))
            .cloned()
        else {
            return command;
        };

        match command.size {
            None => {
                debug!(product = product.id.as_str(), quantity, "awaiting size");
                self.state = ConversationState::AwaitingSize(PendingSlot {
                    product_id: product.id,
                    product_name: product.name,
                    quantity,
                });
                toasts.push(PICK_A_SIZE.to_string());
                command.awaiting_size()
            }
            Some(size) => {
                self.state = ConversationState::Idle;
                self.put_in_cart(&product, size, quantity, toasts);
                command
            }
        }
    }

    fn put_in_cart(&mut self, product: &Product, size: Size, quantity: u32, toasts: &mut Vec<String>) {
        let total = self.cart.upsert(&product.name, size, &product.price, quantity);
        info!(
            product = product.id.as_str(),
            size = size.code(),
            quantity,
            total,
            "added to cart"
        );
        toasts.push(if quantity > 1 {
            format!("{} x{} ({}) added", product.name, quantity, size)
        } else {
            format!("{} ({}) added", product.name, size)
        });
    }

    fn delete(
        &mut self,
        command: &Command,
        input: &str,
        quantity: u32,
        toasts: &mut Vec<String>,
    ) {
        if command.target_id.is_none() {
            // only an explicit "clear cart" empties the cart; an unresolved product never does
            if is_clear_cart_command(input) {
                self.cart.clear();
                info!("cart cleared");
                toasts.push(CART_CLEARED.to_string());
            } else {
                debug!("delete without a resolved product, cart unchanged");
            }
            return;
        }
        let removal = self
            .cart
            .remove_quantity(&command.object, command.size, quantity);
        info!(object = command.object.as_str(), quantity, ?removal, "removed from cart");
        toasts.push(if quantity > 1 {
            format!("{} x{} removed", command.object, quantity)
        } else {
            format!("{} removed", command.object)
        });
    }

    /// Change a cart line by `delta` (clamped at zero). Returns the toast.
    pub fn adjust_quantity(&mut self, name: &str, size: Size, delta: i64) -> Result<String> {
        let qty = self.cart.adjust_quantity(name, size, delta)?;
        info!(name, size = size.code(), delta, qty, "quantity adjusted");
        Ok(if delta > 0 {
            format!("{name} ({size}) added")
        } else {
            format!("{name} ({size}) removed")
        })
    }

    /// Move a cart line to another size. Returns the toast, if anything changed.
    pub fn change_size(&mut self, name: &str, from: Size, to: Size) -> Result<Option<String>> {
        self.cart.change_size(name, from, to)?;
        if from == to {
            return Ok(None);
        }
        info!(name, from = from.code(), to = to.code(), "size changed");
        Ok(Some(format!("{name} size updated to {to}")))
    }

    /// Start a hosted checkout for the current cart.
    pub async fn checkout(&self) -> CheckoutOutcome {
        if self.cart.is_empty() {
            return CheckoutOutcome::Failed(CART_EMPTY.to_string());
        }
        let Some(client) = &self.checkout else {
            warn!("checkout requested but no checkout service is configured");
            return CheckoutOutcome::Failed(CHECKOUT_FAILED.to_string());
        };
        match client.create_session(&self.cart.checkout_items()).await {
            Ok(url) => {
                info!(url = url.as_str(), "checkout session created");
                CheckoutOutcome::Redirect(url)
            }
            Err(e) => {
                warn!("checkout failed: {}", e);
                CheckoutOutcome::Failed(e.toast_message())
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            command: self.current.clone(),
            cart: self.cart.items().to_vec(),
            total_cents: self.cart.total_cents(),
            pending: self.state.pending().cloned(),
            log: self.log.entries().cloned().collect(),
        }
    }
}
