use crate::error::ValidationError;
use auditly_client::AuditRequest;
use regex::Regex;
use std::sync::LazyLock;

// Optional scheme, one or more dotted labels, optional path/query.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(https?://)?([a-z0-9_-]+\.)+[a-z0-9_-]+(/[a-z0-9_\-./?%&=]*)?$")
        .expect("URL pattern is a valid regex")
});

/// Check whether `candidate` looks like a host/path the audit service accepts.
///
/// This is deliberately permissive and ASCII-only: internationalized domains
/// and explicit ports are rejected.
pub fn is_valid_url(candidate: &str) -> bool {
    !candidate.is_empty() && URL_PATTERN.is_match(candidate)
}

/// Turn raw user input into a request, or explain why it can't be sent.
pub fn validate_request(input: &str) -> Result<AuditRequest, ValidationError> {
    if is_valid_url(input) {
        Ok(AuditRequest {
            url: input.to_string(),
        })
    } else {
        Err(ValidationError {
            input: input.to_string(),
        })
    }
}
