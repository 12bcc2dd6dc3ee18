//! HTTP client for the shop's service proxy (`/api/normalize-command`,
//! `/api/embeddings-match`, `/api/checkout`).

use crate::checkout::billable_items;
use crate::types::ErrorBody;
use crate::{
    CheckoutClient, CheckoutError, CheckoutItem, CheckoutRequest, CheckoutResponse,
    Disambiguator, MatchCandidate, MatchReport, MatchRequest, NormalizeRequest,
    NormalizeResponse, RemoteOutcome, Result, ServiceConfig, ServiceError,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub struct ServiceClient {
    config: ServiceConfig,
    client: reqwest::Client,
}

impl ServiceClient {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let resp = self.client.post(url).json(body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = error_text(&text);
            if message.is_none() {
                tracing::warn!(
                    status = status.as_u16(),
                    body = text.as_str(),
                    "error response without an error message"
                );
            }
            return Err(ServiceError::Http {
                status: status.as_u16(),
                message,
            });
        }
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ServiceError::InvalidResponse(e.to_string()))
    }
}

/// Non-blank `error` field of a JSON error body.
pub(crate) fn error_text(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|message| !message.trim().is_empty())
}

pub(crate) fn interpret_normalize(resp: NormalizeResponse) -> RemoteOutcome<String> {
    resp.normalized
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .into()
}

pub(crate) fn interpret_checkout(resp: CheckoutResponse) -> Result<String, CheckoutError> {
    match resp.url.filter(|url| !url.is_empty()) {
        Some(url) => Ok(url),
        None => Err(resp
            .error
            .map(CheckoutError::Rejected)
            .unwrap_or_else(|| CheckoutError::Transport("response carried no url".into()))),
    }
}

#[async_trait]
impl Disambiguator for ServiceClient {
    async fn clean_transcript(&self, transcript: &str) -> RemoteOutcome<String> {
        let req = NormalizeRequest {
            transcript: transcript.to_string(),
        };
        match self
            .post_json::<_, NormalizeResponse>(&self.config.normalize_url, &req)
            .await
        {
            Ok(resp) => interpret_normalize(resp),
            Err(e) => {
                tracing::warn!("transcript cleanup unavailable: {}", e);
                RemoteOutcome::Unavailable
            }
        }
    }

    async fn match_product(
        &self,
        query: &str,
        candidates: &[MatchCandidate],
    ) -> RemoteOutcome<String> {
        let req = MatchRequest {
            query: query.to_string(),
            candidates: candidates.to_vec(),
        };
        match self
            .post_json::<_, MatchReport>(&self.config.match_url, &req)
            .await
        {
            Ok(report) => report.best().into(),
            Err(e) => {
                tracing::warn!("embedding match unavailable: {}", e);
                RemoteOutcome::Unavailable
            }
        }
    }

    fn name(&self) -> &str {
        "service-proxy"
    }
}

#[async_trait]
impl CheckoutClient for ServiceClient {
    async fn create_session(&self, items: &[CheckoutItem]) -> Result<String, CheckoutError> {
        let req = CheckoutRequest {
            items: billable_items(items)?,
        };
        let resp: CheckoutResponse = self.post_json(&self.config.checkout_url, &req).await?;
        interpret_checkout(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_text_reads_only_json_error_field() {
        assert_eq!(
            error_text(r#"{"error":"Cart is empty."}"#).as_deref(),
            Some("Cart is empty.")
        );
        assert_eq!(error_text("Bad Gateway"), None);
        assert_eq!(error_text(r#"{"message":"x"}"#), None);
        assert_eq!(error_text("{}"), None);
        assert_eq!(error_text(r#"{"error":"  "}"#), None);
    }

    #[test]
    fn test_error_page_never_becomes_toast() {
        let page = "<html><body><h1>502 Bad Gateway</h1></body></html>";
        for body in [page, "{}"] {
            let err: CheckoutError = ServiceError::Http {
                status: 502,
                message: error_text(body),
            }
            .into();
            assert_eq!(err.toast_message(), "Checkout failed");
        }
        let err: CheckoutError = ServiceError::Http {
            status: 400,
            message: error_text(r#"{"error":"No valid items to checkout."}"#),
        }
        .into();
        assert_eq!(err.toast_message(), "No valid items to checkout.");
    }

    #[test]
    fn test_interpret_normalize() {
        let ok = NormalizeResponse {
            normalized: Some(" add mesh pants ".into()),
            error: None,
        };
        assert_eq!(
            interpret_normalize(ok),
            RemoteOutcome::Resolved("add mesh pants".to_string())
        );
        let blank = NormalizeResponse {
            normalized: Some("   ".into()),
            error: None,
        };
        assert_eq!(interpret_normalize(blank), RemoteOutcome::Unavailable);
        assert_eq!(
            interpret_normalize(NormalizeResponse::default()),
            RemoteOutcome::Unavailable
        );
    }

    #[test]
    fn test_interpret_checkout() {
        let ok = CheckoutResponse {
            url: Some("https://checkout.example/s/1".into()),
            error: None,
        };
        assert_eq!(interpret_checkout(ok).unwrap(), "https://checkout.example/s/1");

        let rejected = CheckoutResponse {
            url: None,
            error: Some("Unable to create checkout session.".into()),
        };
        assert_eq!(
            interpret_checkout(rejected),
            Err(CheckoutError::Rejected(
                "Unable to create checkout session.".into()
            ))
        );

        let silent = interpret_checkout(CheckoutResponse::default()).unwrap_err();
        assert_eq!(silent.toast_message(), "Checkout failed");
    }

    #[test]
    fn test_client_builds_with_default_config() {
        let client = ServiceClient::new(ServiceConfig::default()).unwrap();
        assert_eq!(client.name(), "service-proxy");
        assert_eq!(client.config().timeout_ms, 4000);
    }

    #[tokio::test]
    async fn test_unreachable_service_degrades() {
        let config = ServiceConfig {
            normalize_url: "http://127.0.0.1:9/api/normalize-command".into(),
            match_url: "http://127.0.0.1:9/api/embeddings-match".into(),
            checkout_url: "http://127.0.0.1:9/api/checkout".into(),
            timeout_ms: 500,
        };
        let client = ServiceClient::new(config).unwrap();
        assert_eq!(
            client.clean_transcript("uh add the pants").await,
            RemoteOutcome::Unavailable
        );
        let candidates = vec![MatchCandidate {
            id: "a".into(),
            text: "A".into(),
        }];
        assert_eq!(
            client.match_product("pants", &candidates).await,
            RemoteOutcome::Unavailable
        );
        let items = vec![CheckoutItem {
            name: "A (M)".into(),
            price: "$10".into(),
            qty: 1,
        }];
        let err = client.create_session(&items).await.unwrap_err();
        assert_eq!(err.toast_message(), "Checkout failed");
    }
}
