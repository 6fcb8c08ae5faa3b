use std::env;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Completion endpoint API key — required for `enrich` only.
    pub openai_api_key: String,
    /// Completions API root (defaults to https://api.openai.com/v1).
    pub openai_api_url: String,
    /// Model identifier sent with every completion request.
    pub openai_model: String,
    /// Public AT Protocol API endpoint (defaults to
    /// https://public.api.bsky.app). Collection is read-only — no auth.
    pub public_api_url: String,
    /// Root folder for dataset subfolders.
    pub data_dir: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything except the API key has a default — collection works with
    /// no configuration at all.
    pub fn load() -> Result<Self> {
        Ok(Self {
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_api_url: env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| crate::llm::openai::DEFAULT_API_URL.to_string()),
            openai_model: env::var("MAGPIE_MODEL")
                .unwrap_or_else(|_| crate::llm::openai::DEFAULT_MODEL.to_string()),
            public_api_url: env::var("PUBLIC_API_URL")
                .unwrap_or_else(|_| crate::bluesky::client::DEFAULT_PUBLIC_API_URL.to_string()),
            data_dir: env::var("MAGPIE_DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
        })
    }

    /// Check that the completion endpoint key is configured.
    /// Call this before any operation that codifies text.
    pub fn require_openai(&self) -> Result<()> {
        if self.openai_api_key.is_empty() {
            anyhow::bail!(
                "OPENAI_API_KEY not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }
}
