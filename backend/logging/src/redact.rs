//! Log Redaction Layer
//!
//! Scrubs API keys and bearer tokens from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9\-_]{20,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap()
});
static QUERY_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([?&](?:key|api_key|apikey|token)=)[^&\s]+").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    QUERY_KEY_RE
        .replace_all(&redacted, "${1}[REDACTED_TOKEN]")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_bearer_and_keys() {
        let raw = "401 from https://openrouter.ai with Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9 \
                   key sk-or-v1-0123456789abcdef0123456789abcdef";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
        assert!(!clean.contains("0123456789abcdef0123456789abcdef"));
        assert!(clean.contains("openrouter.ai"));
    }

    #[test]
    fn redacts_query_string_keys() {
        let raw = "error sending request for url (https://example.test/v1/generate?key=AIzaSecret&alt=json)";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("AIzaSecret"));
        assert!(clean.contains("?key=[REDACTED_TOKEN]&alt=json"));
    }

    #[test]
    fn leaves_evidence_text_alone() {
        let raw = "Batch XYZ123 recalled 2 months ago.";
        assert_eq!(redact_sensitive_data(raw), raw);
    }
}
