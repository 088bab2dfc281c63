use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use translation_catalog::backend::BackendClient;
use translation_catalog::catalog::CatalogStore;
use translation_catalog::config::Config;
use translation_catalog::filter::filter_categories;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("translation_catalog=info".parse()?),
        )
        .init();

    info!("Starting translation catalog");

    // Load configuration from environment
    let config = Config::from_env()?;

    let client = reqwest::Client::new();
    let backend = Arc::new(BackendClient::new(client, config.backend_api_url.clone()));

    // Load the catalog from the backend
    let mut store = CatalogStore::new(backend);
    store.load().await?;

    let translation_count: usize = store
        .categories()
        .iter()
        .map(|category| category.translations.len())
        .sum();
    info!(
        "Catalog holds {} categories and {} translations",
        store.categories().len(),
        translation_count
    );

    // Optional search: pass a query as the first argument
    if let Some(query) = std::env::args().nth(1) {
        let visible = filter_categories(store.categories(), &query);
        info!("Query '{}' matches {} categories", query, visible.len());
        for category in &visible {
            info!(
                "  {} ({} translations)",
                category.name(),
                category.translations.len()
            );
            for translation in &category.translations {
                info!(
                    "    {} - {}",
                    translation.translation_key, translation.translation_preview
                );
            }
        }
    }

    Ok(())
}
