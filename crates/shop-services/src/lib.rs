//! shop-services: remote collaborators of the voice shopping assistant
//!
//! This crate wraps the hosted services the interpreter leans on: transcript
//! cleanup, embedding-based product matching and checkout-session creation.
//! Disambiguation is best-effort: every backend reports failures as
//! [`RemoteOutcome::Unavailable`] instead of erroring. Backends are
//! feature-gated; the default build carries the `mock` and `http` backends.

mod error;
pub use error::{CheckoutError, Result, ServiceError};

mod types;
pub use types::{
    CandidateScore, CheckoutItem, CheckoutRequest, CheckoutResponse, GeminiConfig,
    MatchCandidate, MatchReport, MatchRequest, NormalizeRequest, NormalizeResponse,
    RemoteOutcome, ServiceConfig,
};

mod traits;
pub use traits::{CheckoutClient, Disambiguator};

pub mod checkout;
pub use checkout::{billable_items, price_to_cents};

pub mod ranking;
pub use ranking::{best_scored, cosine_similarity, rank_candidates};

#[cfg(feature = "mock")]
pub mod mock;
#[cfg(feature = "mock")]
pub use mock::MockServices;

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::ServiceClient;

#[cfg(feature = "gemini")]
mod gemini;
#[cfg(feature = "gemini")]
pub use gemini::GeminiDisambiguator;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which disambiguation backend to build
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Mock,
    Http,
    Gemini,
}

/// Initialize the service layer
pub fn init() -> Result<()> {
    tracing::info!("Initializing shop services");
    Ok(())
}

/// Create a disambiguation backend
pub fn create_disambiguator(
    kind: BackendKind,
    services: &ServiceConfig,
    gemini: &GeminiConfig,
) -> Result<Arc<dyn Disambiguator>> {
    let _ = (services, gemini);
    match kind {
        #[cfg(feature = "mock")]
        BackendKind::Mock => Ok(Arc::new(MockServices::new())),
        #[cfg(feature = "http")]
        BackendKind::Http => Ok(Arc::new(ServiceClient::new(services.clone())?)),
        #[cfg(feature = "gemini")]
        BackendKind::Gemini => Ok(Arc::new(GeminiDisambiguator::from_env(gemini.clone())?)),
        #[allow(unreachable_patterns)]
        other => Err(ServiceError::Transport(format!(
            "backend {:?} not enabled in this build",
            other
        ))),
    }
}

/// Create a checkout client. Only the service proxy can take payments; the
/// mock backend declines every checkout.
pub fn create_checkout_client(
    kind: BackendKind,
    services: &ServiceConfig,
) -> Result<Arc<dyn CheckoutClient>> {
    let _ = services;
    match kind {
        #[cfg(feature = "http")]
        BackendKind::Http | BackendKind::Gemini => {
            Ok(Arc::new(ServiceClient::new(services.clone())?))
        }
        #[cfg(feature = "mock")]
        BackendKind::Mock => Ok(Arc::new(MockServices::new())),
        #[allow(unreachable_patterns)]
        other => Err(ServiceError::Transport(format!(
            "checkout for backend {:?} not enabled in this build",
            other
        ))),
    }
}
