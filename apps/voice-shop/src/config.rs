//! YAML configuration for the voice-shop binary.

use anyhow::{Context, Result};
use cart_session::SessionConfig;
use intent_parser::{load_catalog_file, Catalog};
use serde::{Deserialize, Serialize};
use shop_services::{BackendKind, GeminiConfig, ServiceConfig};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceShopConfig {
    pub backend: BackendKind,
    pub services: ServiceConfig,
    pub gemini: GeminiConfig,
    pub session: SessionConfig,
    /// Product catalog YAML; the built-in storefront when unset
    pub catalog_path: Option<PathBuf>,
}

impl VoiceShopConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn catalog(&self) -> Result<Catalog> {
        match &self.catalog_path {
            Some(path) => load_catalog_file(path),
            None => Ok(Catalog::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "backend: http\nservices:\n  timeout_ms: 1500\nsession:\n  log_capacity: 10"
        )
        .unwrap();

        let config = VoiceShopConfig::load(file.path()).unwrap();
        assert_eq!(config.backend, BackendKind::Http);
        assert_eq!(config.services.timeout_ms, 1500);
        assert_eq!(
            config.services.checkout_url,
            ServiceConfig::default().checkout_url
        );
        assert_eq!(config.session.log_capacity, 10);
        assert_eq!(config.gemini.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.catalog().unwrap().products().len(), 3);
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = VoiceShopConfig::load(Path::new("/nonexistent/voice-shop.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/voice-shop.yaml"));
    }

    #[test]
    fn test_bad_backend_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "backend: carrier-pigeon").unwrap();
        assert!(VoiceShopConfig::load(file.path()).is_err());
    }
}
