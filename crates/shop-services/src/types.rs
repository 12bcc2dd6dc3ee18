use serde::{Deserialize, Serialize};

/// Result of a best-effort remote call. `Unavailable` means no information was
/// gained and the caller continues with what it already has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome<T> {
    Resolved(T),
    Unavailable,
}

impl<T> From<Option<T>> for RemoteOutcome<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => RemoteOutcome::Resolved(v),
            None => RemoteOutcome::Unavailable,
        }
    }
}

/// A product offered to the embedding matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub id: String,
    pub score: f32,
}

/// Ranking returned by the embedding match service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    #[serde(rename = "bestId", default)]
    pub best_id: Option<String>,
    #[serde(default)]
    pub scores: Vec<CandidateScore>,
}

/// Line sent to the checkout service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub name: String,
    pub price: String,
    pub qty: u32,
}

/// Endpoints of the service proxy (transcript cleanup, embedding match, checkout).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub normalize_url: String,
    pub match_url: String,
    pub checkout_url: String,
    pub timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            normalize_url: "http://127.0.0.1:3000/api/normalize-command".to_string(),
            match_url: "http://127.0.0.1:3000/api/embeddings-match".to_string(),
            checkout_url: "http://127.0.0.1:3000/api/checkout".to_string(),
            timeout_ms: 4000,
        }
    }
}

/// Direct access to the Generative Language API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub base_url: String,
    pub generate_model: String,
    pub embed_model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    pub timeout_ms: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            generate_model: "gemini-1.5-flash".to_string(),
            embed_model: "text-embedding-004".to_string(),
            temperature: 0.2,
            top_p: 0.8,
            max_output_tokens: 40,
            timeout_ms: 4000,
        }
    }
}

// Wire bodies of the service proxy.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeRequest {
    pub transcript: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizeResponse {
    #[serde(default)]
    pub normalized: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    pub query: String,
    pub candidates: Vec<MatchCandidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutResponse {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_outcome_from_option() {
        let hit: RemoteOutcome<&str> = Some("a").into();
        assert_eq!(hit, RemoteOutcome::Resolved("a"));
        let miss: RemoteOutcome<&str> = None.into();
        assert_eq!(miss, RemoteOutcome::Unavailable);
    }

    #[test]
    fn test_match_request_wire_shape() {
        let req = MatchRequest {
            query: "warm running top".into(),
            candidates: vec![MatchCandidate {
                id: "velocity-track-jacket".into(),
                text: "Velocity Track Jacket.".into(),
            }],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["query"], "warm running top");
        assert_eq!(json["candidates"][0]["id"], "velocity-track-jacket");
    }

    #[test]
    fn test_match_report_wire_shape() {
        let report: MatchReport = serde_json::from_str(
            r#"{"bestId":"b","scores":[{"id":"a","score":0.2},{"id":"b","score":0.9}]}"#,
        )
        .unwrap();
        assert_eq!(report.best_id.as_deref(), Some("b"));
        assert_eq!(report.scores.len(), 2);

        let empty: MatchReport = serde_json::from_str(r#"{"bestId":null}"#).unwrap();
        assert_eq!(empty.best_id, None);
        assert!(empty.scores.is_empty());
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let cfg: ServiceConfig = serde_json::from_str(r#"{"timeout_ms": 1500}"#).unwrap();
        assert_eq!(cfg.timeout_ms, 1500);
        assert!(cfg.match_url.ends_with("/api/embeddings-match"));

        let gemini: GeminiConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(gemini.api_key_env, "GEMINI_API_KEY");
        assert_eq!(gemini.max_output_tokens, 40);
    }
}
