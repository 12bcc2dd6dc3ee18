use crate::{CheckoutError, CheckoutItem, MatchCandidate, RemoteOutcome};
use async_trait::async_trait;

/// Remote help for resolving what the shopper meant.
///
/// Implementations swallow their own failures: every error, timeout or malformed
/// body comes back as [`RemoteOutcome::Unavailable`].
#[async_trait]
pub trait Disambiguator: Send + Sync {
    /// Rewrite a noisy transcript into a short "intent + product" command.
    async fn clean_transcript(&self, transcript: &str) -> RemoteOutcome<String>;

    /// Id of the candidate semantically closest to `query`.
    async fn match_product(
        &self,
        query: &str,
        candidates: &[MatchCandidate],
    ) -> RemoteOutcome<String>;

    /// Backend name for logs
    fn name(&self) -> &str;
}

/// Creates hosted checkout sessions.
#[async_trait]
pub trait CheckoutClient: Send + Sync {
    /// Returns the URL the shopper should be redirected to.
    async fn create_session(&self, items: &[CheckoutItem]) -> Result<String, CheckoutError>;
}
