use crate::cache::LanguageCache;
use crate::error::CatalogError;
use crate::gemini::GeminiClient;
use crate::model::{Translation, CANONICAL_LANGUAGE};
use crate::normalize::normalize;
use std::sync::Arc;
use tracing::debug;

/// Instructional preamble sent ahead of every generation prompt.
const MAIN_PROMPT: &str = "This is a translation helper and management tool for developers. \
The goal is to facilitate the creation of multi-language applications. \
You will help with returning the translations of given words and generating the translations \
related to certain categories. Your response should have no introduction nor conclusion.";

/// A translation candidate parsed out of a model response.
///
/// `values` holds `(language, text)` pairs in active-language order.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTranslation {
    pub key: String,
    pub values: Vec<(String, String)>,
}

impl GeneratedTranslation {
    /// The English text, if the candidate carries one.
    pub fn english(&self) -> Option<&str> {
        self.values
            .iter()
            .find(|(language, _)| language == CANONICAL_LANGUAGE)
            .map(|(_, text)| text.as_str())
    }

    /// A candidate is complete once it has a non-empty key and a non-empty
    /// English value.
    pub fn is_complete(&self) -> bool {
        !self.key.trim().is_empty()
            && self.english().is_some_and(|text| !text.trim().is_empty())
    }

    /// Convert into an unsaved catalog translation.
    pub fn into_translation(self) -> Translation {
        Translation::from_details(self.key, self.values)
    }
}

/// Template-driven generation of translation candidates.
///
/// Both entry points consult the language cache for the active language list,
/// prompt Gemini, and run the response through normalization before parsing.
/// AI failures come back as errors from these methods and never touch
/// catalog state.
pub struct TranslationGenerator {
    gemini: GeminiClient,
    languages: Arc<LanguageCache>,
}

impl TranslationGenerator {
    pub fn new(gemini: GeminiClient, languages: Arc<LanguageCache>) -> Self {
        Self { gemini, languages }
    }

    /// Generate one translation record covering all active languages for a
    /// single key. Fails if the model does not produce a complete record.
    pub async fn generate_for_key(&self, key: &str) -> Result<GeneratedTranslation, CatalogError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CatalogError::Validation {
                field: "translationKey",
                message: "Translation key is required",
            });
        }

        let languages = self.languages.get().await?;
        let prompt = build_key_prompt(key, &languages);

        let raw = self.gemini.generate_content(&prompt).await?;
        let cleaned = normalize(&raw);
        let records = parse_records(&cleaned)?;

        let names = LanguageCache::split_list(&languages);
        let candidate = records
            .iter()
            .filter_map(|record| record_to_candidate(record, &names))
            .next()
            .ok_or_else(|| {
                CatalogError::AiResponseMalformed(
                    "response contained no translation record".to_string(),
                )
            })?;

        if !candidate.is_complete() {
            return Err(CatalogError::AiResponseMalformed(format!(
                "record for '{}' is missing an English value",
                candidate.key
            )));
        }

        Ok(candidate)
    }

    /// Generate a batch of translation candidates for a category described by
    /// its name and description. Candidates without a key or English value
    /// are dropped; a partial batch is still a success.
    pub async fn generate_for_category(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Vec<GeneratedTranslation>, CatalogError> {
        if name.trim().is_empty() {
            return Err(CatalogError::Validation {
                field: "name",
                message: "Category name is required",
            });
        }
        if description.trim().is_empty() {
            return Err(CatalogError::Validation {
                field: "description",
                message: "Category description is required",
            });
        }

        let languages = self.languages.get().await?;
        let prompt = build_category_prompt(name, description, &languages);

        let raw = self.gemini.generate_content(&prompt).await?;
        let cleaned = normalize(&raw);
        let records = parse_records(&cleaned)?;

        let names = LanguageCache::split_list(&languages);
        let mut candidates = Vec::with_capacity(records.len());
        for record in &records {
            match record_to_candidate(record, &names) {
                Some(candidate) if candidate.is_complete() => candidates.push(candidate),
                Some(candidate) => {
                    debug!("Dropping incomplete candidate '{}'", candidate.key);
                }
                None => debug!("Dropping record without a usable key"),
            }
        }

        Ok(candidates)
    }
}

/// Build the prompt for single-key generation.
fn build_key_prompt(key: &str, languages: &str) -> String {
    format!(
        r#"{} Given this translation key: {}, give an appropriate translation for these languages: {} following this form:
{{
  "key": "{}",
  "Language_1": "Language_1 translation",
  "Language_2": "Language_2 translation"
}}
For example: for a key "user_deleted_successfully", and languages of English and French, you could return a translation as follows, make sure to return a valid JSON.
[
  {{
    "key": "user_deleted_successfully",
    "English": "User was deleted successfully",
    "French": "L'utilisateur a été supprimé avec succès"
  }}
]"#,
        MAIN_PROMPT, key, languages, key
    )
}

/// Build the prompt for whole-category generation.
fn build_category_prompt(name: &str, description: &str, languages: &str) -> String {
    format!(
        r#"{} Given the translation category with this name: {}, and this description: {}, and for these languages: {} give translations as a JSON format of this shape:
[{{
  "key": "translation_key",
  "Language_1": "Language_1 translation",
  "Language_2": "Language_2 translation"
}}]
For example: for a category named "user", and a description "user actions", and languages of English and French, you could return translations as follows, make sure to return a valid JSON.
[
  {{
    "key": "user_deleted_successfully",
    "English": "User was deleted successfully",
    "French": "L'utilisateur a été supprimé avec succès"
  }},
  {{
    "key": "user_logged_in_successfully",
    "English": "User logged in successfully",
    "French": "L'utilisateur s'est connecté avec succès"
  }}
]"#,
        MAIN_PROMPT, name, description, languages
    )
}

/// Parse cleaned text into record objects; a lone object counts as a batch
/// of one.
fn parse_records(cleaned: &str) -> Result<Vec<serde_json::Value>, CatalogError> {
    let value: serde_json::Value = serde_json::from_str(cleaned)
        .map_err(|e| CatalogError::AiResponseMalformed(format!("invalid JSON: {}", e)))?;

    match value {
        serde_json::Value::Array(items) => Ok(items),
        object @ serde_json::Value::Object(_) => Ok(vec![object]),
        other => Err(CatalogError::AiResponseMalformed(format!(
            "expected an object or array, got {}",
            other
        ))),
    }
}

/// Decode one record defensively: a `key` string plus per-language strings.
/// Languages the catalog does not know about are ignored; blank values are
/// skipped. Returns `None` when the record has no usable key.
fn record_to_candidate(
    record: &serde_json::Value,
    languages: &[&str],
) -> Option<GeneratedTranslation> {
    let object = record.as_object()?;
    let key = object.get("key")?.as_str()?.trim();
    if key.is_empty() {
        return None;
    }

    let values: Vec<(String, String)> = languages
        .iter()
        .filter_map(|language| {
            object
                .get(*language)
                .and_then(|value| value.as_str())
                .filter(|text| !text.trim().is_empty())
                .map(|text| (language.to_string(), text.to_string()))
        })
        .collect();

    Some(GeneratedTranslation {
        key: key.to_string(),
        values,
    })
}
