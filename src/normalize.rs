//! Cleanup of raw generative-API text into parseable JSON.
//!
//! Gemini wraps answers in Markdown code fences more often than not, and the
//! decoded text occasionally carries stray control or zero-width characters
//! that break `serde_json`. This module performs the mechanical cleanup steps
//! only; if the result still fails to parse, that is reported upstream as a
//! malformed-response error rather than repaired here.

use regex::Regex;
use std::sync::OnceLock;

fn leading_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:```(?:json)?\s*)+").expect("valid regex"))
}

fn trailing_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:\s*```)+$").expect("valid regex"))
}

/// Characters the cleaned text may contain: printable ASCII, the Latin-1
/// supplement (accented French text), and the Arabic block.
fn is_allowed(c: char) -> bool {
    matches!(c, '\x20'..='\x7e' | '\u{00A0}'..='\u{00FF}' | '\u{0600}'..='\u{06FF}')
}

/// Strip code fences and non-printable characters from a model response.
///
/// Idempotent: normalizing an already-normalized string returns it unchanged.
pub fn normalize(raw: &str) -> String {
    // Dropping disallowed characters first (newlines included) means the
    // fence markers sit flush against the payload for the regexes below.
    let cleaned: String = raw.chars().filter(|&c| is_allowed(c)).collect();

    let cleaned = leading_fence().replace(cleaned.trim_start(), "");
    let cleaned = trailing_fence().replace(&cleaned, "");

    // Stray backticks survive when the model closes a fence it never opened
    // cleanly; they always sit at the very end, mixed with whitespace.
    cleaned
        .trim_end_matches(|c: char| c == '`' || c.is_whitespace())
        .to_string()
}
