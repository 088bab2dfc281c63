use crate::backend::BackendClient;
use crate::error::CatalogError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Cached copy of the allowed-language list.
///
/// The backend's language configuration changes rarely, so the formatted list
/// (`"English, French, Arabic"`) is kept for a freshness window (24 hours by
/// default) and only re-fetched lazily by the first read after expiry. There
/// is no background refresh and no write-triggered invalidation.
pub struct LanguageCache {
    backend: Arc<BackendClient>,
    ttl: Duration,
    slot: Mutex<Option<CacheSlot>>,
}

#[derive(Debug, Clone)]
struct CacheSlot {
    value: String,
    expires_at: Instant,
}

impl LanguageCache {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self::with_ttl(backend, Self::DEFAULT_TTL)
    }

    pub fn with_ttl(backend: Arc<BackendClient>, ttl: Duration) -> Self {
        Self {
            backend,
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// The current allowed-language list.
    ///
    /// Serves the cached value while it is fresh. Once expired (or on first
    /// use) it re-fetches; if that fetch fails but a previous value exists,
    /// the stale value is served rather than failing the caller.
    pub async fn get(&self) -> Result<String, CatalogError> {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref() {
            if Instant::now() < cached.expires_at {
                return Ok(cached.value.clone());
            }
        }

        match self.backend.get_languages().await {
            Ok(value) => {
                debug!("Refreshed language list: {}", value);
                *slot = Some(CacheSlot {
                    value: value.clone(),
                    expires_at: Instant::now() + self.ttl,
                });
                Ok(value)
            }
            Err(e) => match slot.as_ref() {
                Some(stale) => {
                    warn!("Language refresh failed ({}), serving stale list", e);
                    Ok(stale.value.clone())
                }
                None => Err(e),
            },
        }
    }

    /// Split a formatted language list into individual names.
    pub fn split_list(languages: &str) -> Vec<&str> {
        languages
            .split(", ")
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend_for(server: &MockServer) -> Arc<BackendClient> {
        Arc::new(BackendClient::new(
            reqwest::Client::new(),
            format!("{}/api", server.uri()),
        ))
    }

    async fn mount_languages(server: &MockServer, value: &str, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/api/translations/languages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(value)))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    // ==================== Freshness Window Tests ====================

    #[tokio::test]
    async fn test_second_read_within_ttl_hits_cache() {
        let server = MockServer::start().await;
        mount_languages(&server, "English, French, Arabic", 1).await;

        let cache = LanguageCache::new(backend_for(&server));
        let first = cache.get().await.expect("Should succeed");
        let second = cache.get().await.expect("Should succeed");

        assert_eq!(first, "English, French, Arabic");
        assert_eq!(first, second);
        // The mock's expect(1) verifies exactly one backend fetch on drop.
    }

    #[tokio::test]
    async fn test_read_after_expiry_refetches_once() {
        let server = MockServer::start().await;
        mount_languages(&server, "English, French", 2).await;

        let cache = LanguageCache::with_ttl(backend_for(&server), Duration::from_millis(20));
        cache.get().await.expect("Should succeed");

        tokio::time::sleep(Duration::from_millis(40)).await;

        let refreshed = cache.get().await.expect("Should succeed");
        assert_eq!(refreshed, "English, French");
    }

    #[tokio::test]
    async fn test_values_identical_within_window() {
        let server = MockServer::start().await;
        mount_languages(&server, "English, Arabic", 1).await;

        let cache = LanguageCache::new(backend_for(&server));
        let a = cache.get().await.expect("Should succeed");
        let b = cache.get().await.expect("Should succeed");
        let c = cache.get().await.expect("Should succeed");

        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    // ==================== Failure Handling Tests ====================

    #[tokio::test]
    async fn test_first_fetch_failure_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/translations/languages"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let cache = LanguageCache::new(backend_for(&server));
        let err = cache.get().await.unwrap_err();

        assert!(matches!(err, CatalogError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_stale_value_served_when_refresh_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/translations/languages"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!("English, French")),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/translations/languages"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let cache = LanguageCache::with_ttl(backend_for(&server), Duration::from_millis(10));
        let fresh = cache.get().await.expect("Should succeed");

        tokio::time::sleep(Duration::from_millis(30)).await;

        let stale = cache.get().await.expect("Stale value should be served");
        assert_eq!(fresh, stale);
    }

    // ==================== split_list Tests ====================

    #[test]
    fn test_split_list() {
        assert_eq!(
            LanguageCache::split_list("English, French, Arabic"),
            vec!["English", "French", "Arabic"]
        );
    }

    #[test]
    fn test_split_list_single_language() {
        assert_eq!(LanguageCache::split_list("English"), vec!["English"]);
    }

    #[test]
    fn test_split_list_empty() {
        assert!(LanguageCache::split_list("").is_empty());
    }
}
