use crate::backend::BackendClient;
use crate::error::CatalogError;
use crate::model::{Category, CategoryWithTranslations, Translation};
use std::sync::Arc;
use tracing::{info, warn};

/// The authoritative in-memory catalog for one session.
///
/// Every mutation goes through the backend first and is reflected locally
/// only on success, so derived views (filtering, selection) never fork from
/// the canonical collection. Mutation failures are logged and re-thrown;
/// nothing is swallowed on a write path.
pub struct CatalogStore {
    backend: Arc<BackendClient>,
    categories: Vec<CategoryWithTranslations>,
    focused_category: Option<String>,
}

impl CatalogStore {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self {
            backend,
            categories: Vec::new(),
            focused_category: None,
        }
    }

    /// Replace the local collection with the backend's current state.
    pub async fn load(&mut self) -> Result<(), CatalogError> {
        self.categories = self.backend.get_categories().await?;
        info!("Loaded {} categories", self.categories.len());
        Ok(())
    }

    pub fn categories(&self) -> &[CategoryWithTranslations] {
        &self.categories
    }

    /// All translations across categories, in display order.
    pub fn flattened_translations(&self) -> Vec<Translation> {
        self.categories
            .iter()
            .flat_map(|category| category.translations.iter().cloned())
            .collect()
    }

    // ==================== Category Focus ====================

    /// Mark a category as the context for subsequent translation creation.
    pub fn focus_category(&mut self, name: impl Into<String>) {
        self.focused_category = Some(name.into());
    }

    pub fn focused_category(&self) -> Option<&str> {
        self.focused_category.as_deref()
    }

    /// Any mutation drops the focus so later actions cannot silently target
    /// a stale selection.
    fn clear_focus(&mut self) {
        self.focused_category = None;
    }

    // ==================== Translation Mutations ====================

    /// Create a translation. When a category is focused, its name is stamped
    /// onto the record before submission.
    pub async fn add_translation(
        &mut self,
        mut translation: Translation,
    ) -> Result<Translation, CatalogError> {
        if let Some(name) = &self.focused_category {
            translation.category_name = Some(name.clone());
        }

        if let Err(e) = translation.validate() {
            self.clear_focus();
            return Err(e);
        }

        let result = self.backend.add_translation(&translation).await;
        self.clear_focus();

        match result {
            Ok(created) => {
                self.attach_translation(created.clone());
                Ok(created)
            }
            Err(e) => {
                warn!("Failed to create translation: {}", e);
                Err(e)
            }
        }
    }

    /// Update a translation by id and reflect the result locally.
    pub async fn update_translation(
        &mut self,
        id: &str,
        translation: Translation,
    ) -> Result<Translation, CatalogError> {
        if let Err(e) = translation.validate() {
            self.clear_focus();
            return Err(e);
        }

        let result = self.backend.update_translation(id, &translation).await;
        self.clear_focus();

        match result {
            Ok(updated) => {
                for category in &mut self.categories {
                    for existing in &mut category.translations {
                        if existing.id.as_deref() == Some(id) {
                            *existing = updated.clone();
                        }
                    }
                }
                Ok(updated)
            }
            Err(e) => {
                warn!("Failed to update translation {}: {}", id, e);
                Err(e)
            }
        }
    }

    /// Delete a translation by id and drop it from the local collection.
    pub async fn delete_translation(&mut self, id: &str) -> Result<(), CatalogError> {
        let result = self.backend.delete_translation(id).await;
        self.clear_focus();

        match result {
            Ok(()) => {
                for category in &mut self.categories {
                    category
                        .translations
                        .retain(|translation| translation.id.as_deref() != Some(id));
                }
                Ok(())
            }
            Err(e) => {
                warn!("Failed to delete translation {}: {}", id, e);
                Err(e)
            }
        }
    }

    // ==================== Category Mutations ====================

    /// Create a category, then bulk-insert its seed translations (if any)
    /// under it in a second call.
    pub async fn add_category(
        &mut self,
        category: Category,
        seed_translations: Vec<Translation>,
    ) -> Result<CategoryWithTranslations, CatalogError> {
        if let Err(e) = category.validate() {
            self.clear_focus();
            return Err(e);
        }

        let result = self.create_with_seeds(category, seed_translations).await;
        self.clear_focus();

        match result {
            Ok(created) => {
                self.categories.push(created.clone());
                Ok(created)
            }
            Err(e) => {
                warn!("Failed to create category: {}", e);
                Err(e)
            }
        }
    }

    async fn create_with_seeds(
        &self,
        category: Category,
        seed_translations: Vec<Translation>,
    ) -> Result<CategoryWithTranslations, CatalogError> {
        let created = self.backend.add_category(&category).await?;

        let translations = if seed_translations.is_empty() {
            Vec::new()
        } else {
            self.backend
                .insert_translations_bulk(&created.name, &seed_translations)
                .await?
        };

        Ok(CategoryWithTranslations {
            category: created,
            translations,
        })
    }

    /// Update a category keyed by its current name. Renames migrate the key
    /// on the server; locally the nested translations are restamped with the
    /// new name so the weak references stay consistent.
    pub async fn update_category(
        &mut self,
        current_name: &str,
        updated: Category,
    ) -> Result<Category, CatalogError> {
        if let Err(e) = updated.validate() {
            self.clear_focus();
            return Err(e);
        }

        let result = self.backend.update_category(current_name, &updated).await;
        self.clear_focus();

        match result {
            Ok(stored) => {
                if let Some(entry) = self
                    .categories
                    .iter_mut()
                    .find(|entry| entry.name() == current_name)
                {
                    entry.category = stored.clone();
                    for translation in &mut entry.translations {
                        if translation.category_name.is_some() {
                            translation.category_name = Some(stored.name.clone());
                        }
                    }
                }
                Ok(stored)
            }
            Err(e) => {
                warn!("Failed to update category '{}': {}", current_name, e);
                Err(e)
            }
        }
    }

    /// Delete a category by name. Its translations are NOT cascaded; removing
    /// them is an explicit separate step for the caller.
    pub async fn delete_category(&mut self, name: &str) -> Result<(), CatalogError> {
        let result = self.backend.delete_category(name).await;
        self.clear_focus();

        match result {
            Ok(()) => {
                self.categories.retain(|entry| entry.name() != name);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to delete category '{}': {}", name, e);
                Err(e)
            }
        }
    }

    /// Attach a newly created translation to its local category, if the
    /// category is loaded.
    fn attach_translation(&mut self, translation: Translation) {
        let Some(name) = translation.category_name.clone() else {
            return;
        };
        if let Some(entry) = self
            .categories
            .iter_mut()
            .find(|entry| entry.name() == name)
        {
            entry.translations.push(translation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> CatalogStore {
        let backend = Arc::new(BackendClient::new(
            reqwest::Client::new(),
            format!("{}/api", server.uri()),
        ));
        CatalogStore::new(backend)
    }

    fn offline_store() -> CatalogStore {
        CatalogStore::new(Arc::new(BackendClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:1/api",
        )))
    }

    async fn mount_categories(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/category"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "name": "Greetings",
                    "translations": [
                        {
                            "id": "t-1",
                            "translationKey": "welcome_message",
                            "translationPreview": "Welcome",
                            "detailedTranslations": ["English: Welcome"],
                            "categoryName": "Greetings"
                        }
                    ]
                },
                {
                    "name": "Errors",
                    "translations": []
                }
            ])))
            .mount(server)
            .await;
    }

    fn complete_translation(key: &str) -> Translation {
        Translation::from_details(key, vec![("English", "Text")])
    }

    // ==================== Load Tests ====================

    #[tokio::test]
    async fn test_load_populates_collection() {
        let server = MockServer::start().await;
        mount_categories(&server).await;

        let mut store = store_for(&server);
        store.load().await.expect("Should succeed");

        assert_eq!(store.categories().len(), 2);
        assert_eq!(store.categories()[0].name(), "Greetings");
        assert_eq!(store.flattened_translations().len(), 1);
    }

    // ==================== Focus Stamping Tests ====================

    #[tokio::test]
    async fn test_add_translation_stamps_focused_category() {
        let server = MockServer::start().await;
        mount_categories(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/translations"))
            .and(body_partial_json(serde_json::json!({
                "categoryName": "Greetings"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "t-2",
                "translationKey": "goodbye_message",
                "detailedTranslations": ["English: Goodbye"],
                "categoryName": "Greetings"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut store = store_for(&server);
        store.load().await.expect("Should succeed");
        store.focus_category("Greetings");

        let created = store
            .add_translation(complete_translation("goodbye_message"))
            .await
            .expect("Should succeed");

        assert_eq!(created.category_name.as_deref(), Some("Greetings"));
        // Focus is dropped after the mutation.
        assert!(store.focused_category().is_none());
        // The new row shows up under its local category.
        assert_eq!(store.categories()[0].translations.len(), 2);
    }

    #[tokio::test]
    async fn test_add_translation_without_focus_keeps_own_category() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/translations"))
            .and(body_partial_json(serde_json::json!({
                "categoryName": "Errors"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "t-9",
                "translationKey": "oops",
                "detailedTranslations": ["English: Oops"],
                "categoryName": "Errors"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut store = store_for(&server);
        let mut translation = complete_translation("oops");
        translation.category_name = Some("Errors".to_string());

        store.add_translation(translation).await.expect("Should succeed");
    }

    // ==================== Validation Tests ====================

    #[tokio::test]
    async fn test_add_translation_validates_before_network() {
        let mut store = offline_store();

        let mut missing_english = complete_translation("key");
        missing_english.detailed_translations = vec!["French: Texte".to_string()];

        let err = store.add_translation(missing_english).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation { field: "English", .. }
        ));
    }

    #[tokio::test]
    async fn test_add_category_validates_before_network() {
        let mut store = offline_store();

        let err = store
            .add_category(Category::new("  ", None), Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation { field: "name", .. }
        ));
    }

    // ==================== Failure Propagation Tests ====================

    #[tokio::test]
    async fn test_add_translation_failure_is_rethrown_and_clears_focus() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/translations"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let mut store = store_for(&server);
        store.focus_category("Greetings");

        let err = store
            .add_translation(complete_translation("key"))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Transport { .. }));
        assert!(store.focused_category().is_none());
    }

    #[tokio::test]
    async fn test_delete_translation_failure_keeps_local_row() {
        let server = MockServer::start().await;
        mount_categories(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/api/translations/t-1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let mut store = store_for(&server);
        store.load().await.expect("Should succeed");

        let err = store.delete_translation("t-1").await.unwrap_err();
        assert!(matches!(err, CatalogError::Transport { .. }));
        assert_eq!(store.flattened_translations().len(), 1);
    }

    // ==================== Category Mutation Tests ====================

    #[tokio::test]
    async fn test_add_category_with_seeds_issues_bulk_insert() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/category"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "c-1",
                "name": "Greetings"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/category/Greetings/translations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "t-1", "translationKey": "welcome_message",
                 "detailedTranslations": ["English: Welcome"]}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let mut store = store_for(&server);
        let created = store
            .add_category(
                Category::new("Greetings", Some("Salutations".to_string())),
                vec![complete_translation("welcome_message")],
            )
            .await
            .expect("Should succeed");

        assert_eq!(created.name(), "Greetings");
        assert_eq!(created.translations.len(), 1);
        assert_eq!(store.categories().len(), 1);
    }

    #[tokio::test]
    async fn test_add_category_without_seeds_skips_bulk_insert() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/category"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "Empty"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut store = store_for(&server);
        store
            .add_category(Category::new("Empty", None), Vec::new())
            .await
            .expect("Should succeed");

        // Only the category POST went out.
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_category_rename_restamps_translations() {
        let server = MockServer::start().await;
        mount_categories(&server).await;
        Mock::given(method("PATCH"))
            .and(path("/api/category/Greetings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Salutations",
                "description": "renamed"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut store = store_for(&server);
        store.load().await.expect("Should succeed");

        store
            .update_category(
                "Greetings",
                Category::new("Salutations", Some("renamed".to_string())),
            )
            .await
            .expect("Should succeed");

        let renamed = &store.categories()[0];
        assert_eq!(renamed.name(), "Salutations");
        assert_eq!(
            renamed.translations[0].category_name.as_deref(),
            Some("Salutations")
        );
    }

    #[tokio::test]
    async fn test_delete_category_does_not_cascade_translations() {
        let server = MockServer::start().await;
        mount_categories(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/api/category/Greetings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let mut store = store_for(&server);
        store.load().await.expect("Should succeed");
        store.delete_category("Greetings").await.expect("Should succeed");

        assert_eq!(store.categories().len(), 1);
        assert_eq!(store.categories()[0].name(), "Errors");
        // Exactly one DELETE for the category, none for its translations.
        let deletes = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.method.to_string() == "DELETE")
            .count();
        assert_eq!(deletes, 1);
    }

    // ==================== Local Reflection Tests ====================

    #[tokio::test]
    async fn test_update_translation_replaces_local_entry() {
        let server = MockServer::start().await;
        mount_categories(&server).await;
        Mock::given(method("PATCH"))
            .and(path("/api/translations/t-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "t-1",
                "translationKey": "welcome_message",
                "translationPreview": "Hello there",
                "detailedTranslations": ["English: Hello there"],
                "categoryName": "Greetings"
            })))
            .mount(&server)
            .await;

        let mut store = store_for(&server);
        store.load().await.expect("Should succeed");

        let mut updated = complete_translation("welcome_message");
        updated.detailed_translations = vec!["English: Hello there".to_string()];
        store
            .update_translation("t-1", updated)
            .await
            .expect("Should succeed");

        let local = &store.categories()[0].translations[0];
        assert_eq!(local.translation_preview, "Hello there");
    }

    #[tokio::test]
    async fn test_delete_translation_removes_local_entry() {
        let server = MockServer::start().await;
        mount_categories(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/api/translations/t-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let mut store = store_for(&server);
        store.load().await.expect("Should succeed");
        store.delete_translation("t-1").await.expect("Should succeed");

        assert!(store.flattened_translations().is_empty());
    }
}
