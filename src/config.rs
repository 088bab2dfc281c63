use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Catalog backend
    pub backend_api_url: String,

    // Gemini
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_url: String,

    // Language cache
    pub language_cache_ttl_hours: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Catalog backend
            backend_api_url: std::env::var("BACKEND_API_URL")
                .context("BACKEND_API_URL not set")?,

            // Gemini
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .context("GEMINI_API_KEY not set")?,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            gemini_api_url: std::env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string()),

            // Language cache
            language_cache_ttl_hours: std::env::var("LANGUAGE_CACHE_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
        })
    }
}
