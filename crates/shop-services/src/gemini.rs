//! Direct Generative Language API backend: transcript cleanup through
//! `generateContent`, product matching through `batchEmbedContents` with
//! cosine ranking done locally.

use crate::http::error_text;
use crate::ranking::rank_candidates;
use crate::{Disambiguator, GeminiConfig, MatchCandidate, RemoteOutcome, Result, ServiceError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CLEANUP_INSTRUCTION: &str = "Normalize the spoken shopping command into a clean, short command. \
Keep only the intent and product name. If a size is mentioned, keep it. \
Return only the cleaned command text with no punctuation beyond spaces. ";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateCandidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<GenerateCandidate>,
}

impl GenerateResponse {
    fn first_text(&self) -> Option<String> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .map(|p| p.text.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest {
    model: String,
    content: Content,
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedRequest>,
}

#[derive(Debug, Default, Deserialize)]
struct Embedding {
    #[serde(default)]
    values: Vec<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<Embedding>,
}

pub struct GeminiDisambiguator {
    config: GeminiConfig,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiDisambiguator {
    /// Reads the API key from `config.api_key_env`.
    pub fn from_env(config: GeminiConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ServiceError::MissingCredentials(config.api_key_env.clone()))?;
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: GeminiConfig, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ServiceError::MissingCredentials(config.api_key_env.clone()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.base_url.trim_end_matches('/'),
            model,
            method
        )
    }

    async fn post<B: Serialize + Sync, R: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<R> {
        let resp = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;
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

    async fn generate_cleanup(&self, transcript: &str) -> Result<Option<String>> {
        let req = GenerateRequest {
            contents: vec![Content::text(Some("user"), &cleanup_prompt(transcript))],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                max_output_tokens: self.config.max_output_tokens,
            },
        };
        let url = self.endpoint(&self.config.generate_model, "generateContent");
        let resp: GenerateResponse = self.post(&url, &req).await?;
        Ok(resp.first_text())
    }

    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let model = format!("models/{}", self.config.embed_model);
        let req = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedRequest {
                    model: model.clone(),
                    content: Content::text(None, text),
                })
                .collect(),
        };
        let url = self.endpoint(&self.config.embed_model, "batchEmbedContents");
        let resp: BatchEmbedResponse = self.post(&url, &req).await?;
        Ok(resp.embeddings.into_iter().map(|e| e.values).collect())
    }
}

fn cleanup_prompt(transcript: &str) -> String {
    format!("{CLEANUP_INSTRUCTION}Transcript: {transcript}")
}

#[async_trait]
impl Disambiguator for GeminiDisambiguator {
    async fn clean_transcript(&self, transcript: &str) -> RemoteOutcome<String> {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return RemoteOutcome::Unavailable;
        }
        match self.generate_cleanup(transcript).await {
            Ok(text) => text.into(),
            Err(e) => {
                tracing::warn!("gemini cleanup unavailable: {}", e);
                RemoteOutcome::Unavailable
            }
        }
    }

    async fn match_product(
        &self,
        query: &str,
        candidates: &[MatchCandidate],
    ) -> RemoteOutcome<String> {
        let query = query.trim();
        if query.is_empty() || candidates.is_empty() {
            return RemoteOutcome::Unavailable;
        }
        let inputs: Vec<String> = std::iter::once(query.to_string())
            .chain(candidates.iter().map(|c| c.text.clone()))
            .collect();
        let vectors = match self.embed(inputs).await {
            Ok(vectors) => vectors,
            Err(e) => {
                tracing::warn!("gemini embeddings unavailable: {}", e);
                return RemoteOutcome::Unavailable;
            }
        };
        let Some((query_vec, candidate_vecs)) = vectors.split_first() else {
            return RemoteOutcome::Unavailable;
        };
        if candidate_vecs.is_empty() {
            tracing::warn!("gemini returned no candidate embeddings");
            return RemoteOutcome::Unavailable;
        }
        let report = rank_candidates(query_vec, candidates, candidate_vecs);
        tracing::debug!(scores = ?report.scores, "embedding ranking");
        report.best_id.into()
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
