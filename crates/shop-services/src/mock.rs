//! Scripted in-process services for development and testing

use crate::{
    CheckoutClient, CheckoutError, CheckoutItem, Disambiguator, MatchCandidate, RemoteOutcome,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Mock services. Unscripted calls return `Unavailable`, like an offline backend.
#[derive(Debug, Default)]
pub struct MockServices {
    cleanups: HashMap<String, String>,
    matches: HashMap<String, String>,
    default_match: Option<String>,
    checkout: Option<Result<String, CheckoutError>>,
    latency: Option<Duration>,
    cleanup_calls: AtomicUsize,
    match_calls: AtomicUsize,
    checkout_requests: Mutex<Vec<Vec<CheckoutItem>>>,
}

impl MockServices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clean `raw` into `cleaned`.
    pub fn with_cleanup(mut self, raw: &str, cleaned: &str) -> Self {
        self.cleanups.insert(raw.to_string(), cleaned.to_string());
        self
    }

    /// Resolve `query` to `product_id`.
    pub fn with_match(mut self, query: &str, product_id: &str) -> Self {
        self.matches.insert(query.to_string(), product_id.to_string());
        self
    }

    /// Resolve every unscripted query to `product_id`.
    pub fn with_default_match(mut self, product_id: &str) -> Self {
        self.default_match = Some(product_id.to_string());
        self
    }

    pub fn with_checkout_url(mut self, url: &str) -> Self {
        self.checkout = Some(Ok(url.to_string()));
        self
    }

    pub fn with_checkout_error(mut self, error: CheckoutError) -> Self {
        self.checkout = Some(Err(error));
        self
    }

    /// Delay every disambiguation call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn cleanup_calls(&self) -> usize {
        self.cleanup_calls.load(Ordering::SeqCst)
    }

    pub fn match_calls(&self) -> usize {
        self.match_calls.load(Ordering::SeqCst)
    }

    pub fn remote_calls(&self) -> usize {
        self.cleanup_calls() + self.match_calls()
    }

    /// Item lists submitted to checkout, oldest first.
    pub fn checkout_requests(&self) -> Vec<Vec<CheckoutItem>> {
        self.checkout_requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl Disambiguator for MockServices {
    async fn clean_transcript(&self, transcript: &str) -> RemoteOutcome<String> {
        self.cleanup_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        self.cleanups.get(transcript).cloned().into()
    }

    async fn match_product(
        &self,
        query: &str,
        candidates: &[MatchCandidate],
    ) -> RemoteOutcome<String> {
        self.match_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        self.matches
            .get(query)
            .or(self.default_match.as_ref())
            .filter(|id| candidates.iter().any(|c| &c.id == *id))
            .cloned()
            .into()
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[async_trait]
impl CheckoutClient for MockServices {
    async fn create_session(&self, items: &[CheckoutItem]) -> Result<String, CheckoutError> {
        let billable = crate::checkout::billable_items(items)?;
        if let Ok(mut requests) = self.checkout_requests.lock() {
            requests.push(billable);
        }
        self.checkout
            .clone()
            .unwrap_or_else(|| Err(CheckoutError::Transport("no checkout scripted".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<MatchCandidate> {
        ["stadium-mesh-pants", "velocity-track-jacket"]
            .into_iter()
            .map(|id| MatchCandidate {
                id: id.to_string(),
                text: id.to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_unscripted_calls_are_unavailable() {
        let mock = MockServices::new();
        assert_eq!(mock.clean_transcript("hm").await, RemoteOutcome::Unavailable);
        assert_eq!(
            mock.match_product("hm", &candidates()).await,
            RemoteOutcome::Unavailable
        );
        assert_eq!(mock.cleanup_calls(), 1);
        assert_eq!(mock.match_calls(), 1);
    }

    #[tokio::test]
    async fn test_scripted_responses() {
        let mock = MockServices::new()
            .with_cleanup("uh pants add", "add mesh pants")
            .with_match("something warm", "velocity-track-jacket")
            .with_default_match("stadium-mesh-pants");
        assert_eq!(
            mock.clean_transcript("uh pants add").await,
            RemoteOutcome::Resolved("add mesh pants".to_string())
        );
        assert_eq!(
            mock.match_product("something warm", &candidates()).await,
            RemoteOutcome::Resolved("velocity-track-jacket".to_string())
        );
        assert_eq!(
            mock.match_product("anything", &candidates()).await,
            RemoteOutcome::Resolved("stadium-mesh-pants".to_string())
        );
        assert_eq!(mock.remote_calls(), 3);
    }

    #[tokio::test]
    async fn test_match_must_be_a_candidate() {
        let mock = MockServices::new().with_default_match("studio-cargo-shorts");
        assert_eq!(
            mock.match_product("shorts", &candidates()).await,
            RemoteOutcome::Unavailable
        );
    }

    #[tokio::test]
    async fn test_checkout_records_billable_items() {
        let mock = MockServices::new().with_checkout_url("https://pay.example/s/42");
        let items = vec![
            CheckoutItem {
                name: "Stadium Mesh Pants (M)".into(),
                price: "$78".into(),
                qty: 1,
            },
            CheckoutItem {
                name: "Freebie (S)".into(),
                price: "$0".into(),
                qty: 1,
            },
        ];
        assert_eq!(
            mock.create_session(&items).await.unwrap(),
            "https://pay.example/s/42"
        );
        let sent = mock.checkout_requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].len(), 1);
        assert_eq!(sent[0][0].name, "Stadium Mesh Pants (M)");
    }

    #[tokio::test]
    async fn test_latency_is_applied() {
        let mock = MockServices::new().with_latency(Duration::from_millis(20));
        let start = std::time::Instant::now();
        let _ = mock.clean_transcript("x").await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
