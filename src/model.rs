use crate::error::CatalogError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The language every complete translation must cover.
pub const CANONICAL_LANGUAGE: &str = "English";

/// Separator between the language name and the text in a detail entry.
const DETAIL_SEPARATOR: &str = ": ";

/// One localization key plus its per-language text values.
///
/// `detailed_translations` holds ordered `"Language: Text"` entries, matching
/// the backend wire format. A translation is considered complete once it
/// carries an English entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub translation_key: String,
    #[serde(default)]
    pub translation_preview: String,
    #[serde(default)]
    pub detailed_translations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
}

impl Translation {
    /// Create an unsaved translation from a key and `(language, text)` pairs,
    /// preserving the pair order.
    pub fn from_details<I, S, T>(key: impl Into<String>, details: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let detailed_translations: Vec<String> = details
            .into_iter()
            .map(|(language, text)| format_detail(language.as_ref(), text.as_ref()))
            .collect();

        let translation_preview = detailed_translations
            .iter()
            .filter_map(|entry| split_detail(entry))
            .find(|(language, _)| *language == CANONICAL_LANGUAGE)
            .map(|(_, text)| text.to_string())
            .unwrap_or_default();

        Translation {
            id: None,
            translation_key: key.into(),
            translation_preview,
            detailed_translations,
            category_name: None,
            creation_date: None,
        }
    }

    /// Look up the text for a language, if an entry exists.
    pub fn detail_for(&self, language: &str) -> Option<&str> {
        self.detailed_translations
            .iter()
            .filter_map(|entry| split_detail(entry))
            .find(|(entry_language, _)| *entry_language == language)
            .map(|(_, text)| text)
    }

    /// Whether this translation carries a non-empty English entry.
    pub fn has_english(&self) -> bool {
        self.detail_for(CANONICAL_LANGUAGE)
            .is_some_and(|text| !text.trim().is_empty())
    }

    /// Check the creation-time invariants: a non-empty key and an English entry.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.translation_key.trim().is_empty() {
            return Err(CatalogError::Validation {
                field: "translationKey",
                message: "Translation key is required",
            });
        }
        if !self.has_english() {
            return Err(CatalogError::Validation {
                field: "English",
                message: "English translation is required",
            });
        }
        Ok(())
    }
}

/// A named grouping of translations.
///
/// `name` is the natural key the backend routes on; translations point back
/// at their category by value through `category_name`, so deleting a category
/// does not cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
}

impl Category {
    /// Create an unsaved category.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Category {
            id: None,
            name: name.into(),
            description,
            creation_date: None,
        }
    }

    /// Check the creation-time invariant: a non-empty name.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::Validation {
                field: "name",
                message: "Category name is required",
            });
        }
        Ok(())
    }
}

/// The nested shape the backend lists and the filter engine consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithTranslations {
    #[serde(flatten)]
    pub category: Category,
    #[serde(default)]
    pub translations: Vec<Translation>,
}

impl CategoryWithTranslations {
    pub fn name(&self) -> &str {
        &self.category.name
    }
}

/// Split a `"Language: Text"` entry on the first separator.
pub fn split_detail(entry: &str) -> Option<(&str, &str)> {
    entry.split_once(DETAIL_SEPARATOR)
}

/// Build a `"Language: Text"` entry.
pub fn format_detail(language: &str, text: &str) -> String {
    format!("{}{}{}", language, DETAIL_SEPARATOR, text)
}
