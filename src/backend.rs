use crate::error::CatalogError;
use crate::model::{Category, CategoryWithTranslations, Translation};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

/// Client for the catalog CRUD backend.
///
/// Every endpoint lives under one base URL (e.g. `http://localhost:3000/api`).
/// Non-success statuses become transport errors carrying the status and body;
/// the status code itself is never interpreted here.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    // ==================== Categories ====================

    /// Fetch all categories with their nested translations.
    pub async fn get_categories(&self) -> Result<Vec<CategoryWithTranslations>, CatalogError> {
        let request = self.client.get(format!("{}/category", self.base_url));
        send_json(request, "fetching categories").await
    }

    /// Fetch one category by its name.
    pub async fn get_category(&self, name: &str) -> Result<CategoryWithTranslations, CatalogError> {
        let request = self
            .client
            .get(format!("{}/category/{}", self.base_url, name));
        send_json(request, "fetching category").await
    }

    /// Create a category; the backend echoes the stored resource.
    pub async fn add_category(&self, category: &Category) -> Result<Category, CatalogError> {
        let request = self
            .client
            .post(format!("{}/category", self.base_url))
            .json(category);
        send_json(request, "creating category").await
    }

    /// Update a category, keyed by its current name.
    ///
    /// The backend routes on `name`, so a rename submits the new fields under
    /// the old name and the server migrates the key. Resending unchanged
    /// fields is a no-op on the server side.
    pub async fn update_category(&self, name: &str, category: &Category) -> Result<Category, CatalogError> {
        let request = self
            .client
            .patch(format!("{}/category/{}", self.base_url, name))
            .json(category);
        send_json(request, "updating category").await
    }

    /// Delete a category by name. Its translations are not cascaded.
    pub async fn delete_category(&self, name: &str) -> Result<(), CatalogError> {
        let request = self
            .client
            .delete(format!("{}/category/{}", self.base_url, name));
        send_unit(request, "deleting category").await
    }

    /// Insert a batch of translations under a category in one call.
    pub async fn insert_translations_bulk(
        &self,
        category_name: &str,
        translations: &[Translation],
    ) -> Result<Vec<Translation>, CatalogError> {
        debug!(
            "Bulk-inserting {} translations into category '{}'",
            translations.len(),
            category_name
        );
        let request = self
            .client
            .post(format!(
                "{}/category/{}/translations",
                self.base_url, category_name
            ))
            .json(translations);
        send_json(request, "inserting translations").await
    }

    // ==================== Translations ====================

    /// Fetch the flat list of all translations.
    pub async fn get_translations(&self) -> Result<Vec<Translation>, CatalogError> {
        let request = self.client.get(format!("{}/translations", self.base_url));
        send_json(request, "fetching translations").await
    }

    /// Fetch one translation by id.
    pub async fn get_translation(&self, id: &str) -> Result<Translation, CatalogError> {
        let request = self
            .client
            .get(format!("{}/translations/{}", self.base_url, id));
        send_json(request, "fetching translation").await
    }

    /// Create a translation; the backend echoes the stored resource.
    pub async fn add_translation(&self, translation: &Translation) -> Result<Translation, CatalogError> {
        let request = self
            .client
            .post(format!("{}/translations", self.base_url))
            .json(translation);
        send_json(request, "creating translation").await
    }

    /// Update a translation by id. The backend expects the new fields wrapped
    /// in a `translation` envelope.
    pub async fn update_translation(
        &self,
        id: &str,
        translation: &Translation,
    ) -> Result<Translation, CatalogError> {
        let request = self
            .client
            .patch(format!("{}/translations/{}", self.base_url, id))
            .json(&json!({ "translation": translation }));
        send_json(request, "updating translation").await
    }

    /// Delete one translation by id.
    pub async fn delete_translation(&self, id: &str) -> Result<(), CatalogError> {
        let request = self
            .client
            .delete(format!("{}/translations/{}", self.base_url, id));
        send_unit(request, "deleting translation").await
    }

    /// Delete several translations in one batched call.
    pub async fn delete_translations_bulk(&self, ids: &[String]) -> Result<(), CatalogError> {
        debug!("Bulk-deleting {} translations", ids.len());
        let request = self
            .client
            .delete(format!("{}/translations/delete-bulk", self.base_url))
            .json(&json!({ "translationsIds": ids }));
        send_unit(request, "deleting translations").await
    }

    /// Fetch the allowed-language list, formatted as a comma-and-space
    /// separated string (e.g. `"English, French, Arabic"`).
    pub async fn get_languages(&self) -> Result<String, CatalogError> {
        let request = self
            .client
            .get(format!("{}/translations/languages", self.base_url));
        send_json(request, "fetching languages").await
    }
}

/// Send a request, surface non-success statuses, and decode the JSON body.
async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    context: &'static str,
) -> Result<T, CatalogError> {
    let response = request
        .send()
        .await
        .map_err(|e| CatalogError::transport_send(context, e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogError::transport_status(
            context,
            status.as_u16(),
            &body,
        ));
    }

    response.json::<T>().await.map_err(|e| CatalogError::Transport {
        context,
        detail: format!("unparseable response body: {}", e),
    })
}

/// Send a request and surface non-success statuses, discarding the body.
async fn send_unit(
    request: reqwest::RequestBuilder,
    context: &'static str,
) -> Result<(), CatalogError> {
    let response = request
        .send()
        .await
        .map_err(|e| CatalogError::transport_send(context, e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogError::transport_status(
            context,
            status.as_u16(),
            &body,
        ));
    }

    Ok(())
}
