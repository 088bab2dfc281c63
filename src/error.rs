use thiserror::Error;

/// Errors surfaced by the catalog engine.
///
/// Read paths (search/filter) never produce these; they degrade to empty
/// results instead. Write paths always return the failure to the caller.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network failure or non-success status from the CRUD backend.
    #[error("{context}: {detail}")]
    Transport {
        context: &'static str,
        detail: String,
    },

    /// The generative service was unreachable or returned an error.
    #[error("Generative API call failed: {0}")]
    AiCall(String),

    /// The generative service answered, but the payload could not be parsed
    /// into translation records even after cleanup.
    #[error("Malformed generative API response: {0}")]
    AiResponseMalformed(String),

    /// A required field was missing or empty. Raised before any network call
    /// so the caller can attribute it to a specific input.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },
}

impl CatalogError {
    /// Build a transport error from a response status and body.
    pub fn transport_status(context: &'static str, status: u16, body: &str) -> Self {
        CatalogError::Transport {
            context,
            detail: format!("backend returned {}: {}", status, body),
        }
    }

    /// Build a transport error from a request-level failure (connect, DNS, ...).
    pub fn transport_send(context: &'static str, source: reqwest::Error) -> Self {
        CatalogError::Transport {
            context,
            detail: format!("request failed: {}", source),
        }
    }

    /// The HTTP status carried by a transport or AI error, if one was seen.
    ///
    /// Status codes are embedded in the detail string rather than interpreted,
    /// so this scans for the `"returned NNN"` marker the constructors write.
    pub fn status_code(&self) -> Option<u16> {
        let detail = match self {
            CatalogError::Transport { detail, .. } => detail,
            CatalogError::AiCall(detail) => detail,
            _ => return None,
        };
        let rest = detail.split("returned ").nth(1)?;
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }
}
