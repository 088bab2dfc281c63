//! Preview binary - generates translation candidates without writing to the
//! backend.
//!
//! Usage:
//!   cargo run --bin preview -- <key>                        # One key
//!   cargo run --bin preview -- <name> <description>         # Whole category
//!
//! Required environment variables:
//! - BACKEND_API_URL (for the allowed-language list)
//! - GEMINI_API_KEY
//!
//! Optional:
//! - GEMINI_MODEL (defaults to gemini-1.5-flash)
//! - GEMINI_API_URL

use anyhow::{bail, Result};
use std::sync::Arc;
use translation_catalog::backend::BackendClient;
use translation_catalog::cache::LanguageCache;
use translation_catalog::config::Config;
use translation_catalog::gemini::GeminiClient;
use translation_catalog::generate::TranslationGenerator;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("translation_catalog=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    let client = reqwest::Client::new();
    let backend = Arc::new(BackendClient::new(
        client.clone(),
        config.backend_api_url.clone(),
    ));
    let gemini = GeminiClient::new(
        client,
        config.gemini_api_url.clone(),
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    );
    let generator = TranslationGenerator::new(gemini, Arc::new(LanguageCache::new(backend)));

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [key] => {
            let candidate = generator.generate_for_key(key).await?;
            println!("{}", candidate.key);
            for (language, text) in &candidate.values {
                println!("  {}: {}", language, text);
            }
        }
        [name, description] => {
            let candidates = generator.generate_for_category(name, description).await?;
            println!("{} candidates for category '{}'", candidates.len(), name);
            for candidate in &candidates {
                println!("{}", candidate.key);
                for (language, text) in &candidate.values {
                    println!("  {}: {}", language, text);
                }
            }
        }
        _ => bail!("usage: preview <key> | preview <category-name> <description>"),
    }

    Ok(())
}
