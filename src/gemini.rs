use crate::error::CatalogError;
use crate::retry::{with_retry_if, RetryConfig};
use serde::{Deserialize, Serialize};

/// Gemini `generateContent` request body
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// Thin client for the Gemini text-generation API.
///
/// One capability: prompt in, text out. Transient failures (rate limits,
/// 5xx, network) are retried with backoff before the error is reported.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Send a prompt and return the first candidate's text.
    pub async fn generate_content(&self, prompt: &str) -> Result<String, CatalogError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.api_url, self.model
        );

        with_retry_if(
            &RetryConfig::generative_api(),
            "Gemini generateContent",
            || async {
                let response = self
                    .client
                    .post(&url)
                    .header("x-goog-api-key", &self.api_key)
                    .header("Content-Type", "application/json")
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| CatalogError::AiCall(format!("request failed: {}", e)))?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(CatalogError::AiCall(format!(
                        "Gemini returned {}: {}",
                        status.as_u16(),
                        body
                    )));
                }

                let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
                    CatalogError::AiResponseMalformed(format!("unparseable envelope: {}", e))
                })?;

                parsed
                    .candidates
                    .into_iter()
                    .next()
                    .and_then(|candidate| candidate.content.parts.into_iter().next())
                    .map(|part| part.text)
                    .ok_or_else(|| {
                        CatalogError::AiCall("Gemini response contained no candidates".to_string())
                    })
            },
            is_transient,
        )
        .await
    }
}

/// Retry rate limits, server errors, and network failures; fail immediately
/// on other client errors and on malformed payloads.
fn is_transient(error: &CatalogError) -> bool {
    match error {
        CatalogError::AiCall(detail) => match error.status_code() {
            Some(status) => status == 429 || status >= 500,
            // No status means the request never completed (network error).
            None => !detail.contains("no candidates"),
        },
        _ => false,
    }
}
