//! Client-side search over the nested category/translation catalog.
//!
//! The inclusion rule is deliberately asymmetric: a category-name match wins
//! and widens the result to the category's full translation list, while a
//! translation-only match narrows the category down to just the matching
//! entries.

use crate::model::{CategoryWithTranslations, Translation};

/// Compute the visible subset of the catalog for a free-text query.
///
/// Case-insensitive substring match. An empty query returns the input
/// unchanged. This never fails; a query matching nothing yields an empty
/// list.
pub fn filter_categories(
    categories: &[CategoryWithTranslations],
    query: &str,
) -> Vec<CategoryWithTranslations> {
    if query.is_empty() {
        return categories.to_vec();
    }

    let needle = query.to_lowercase();

    categories
        .iter()
        .filter_map(|category| {
            let name_matches = category.name().to_lowercase().contains(&needle);
            if name_matches {
                // Name match wins: keep every translation, even non-matching ones.
                return Some(category.clone());
            }

            let matching: Vec<Translation> = category
                .translations
                .iter()
                .filter(|translation| translation_matches(translation, &needle))
                .cloned()
                .collect();

            if matching.is_empty() {
                None
            } else {
                Some(CategoryWithTranslations {
                    category: category.category.clone(),
                    translations: matching,
                })
            }
        })
        .collect()
}

/// Whether a translation matches a lowercased needle on its key, preview, or
/// any per-language detail string.
fn translation_matches(translation: &Translation, needle: &str) -> bool {
    translation.translation_key.to_lowercase().contains(needle)
        || translation
            .translation_preview
            .to_lowercase()
            .contains(needle)
        || translation
            .detailed_translations
            .iter()
            .any(|detail| detail.to_lowercase().contains(needle))
}
