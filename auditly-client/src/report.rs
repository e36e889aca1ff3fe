use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Report body returned by the audit service.
///
/// The payload is kept exactly as decoded. Every field is optional, so the
/// accessors below return `None` (or an empty list) for anything missing,
/// `null`, or of an unexpected JSON type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditReport(Value);

impl AuditReport {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// `seo.title`
    pub fn title(&self) -> Option<&str> {
        self.str_at("/seo/title")
    }

    /// `seo.metaDescription`
    pub fn meta_description(&self) -> Option<&str> {
        self.str_at("/seo/metaDescription")
    }

    /// Number of entries in `seo.headings.h1`, whatever their type.
    pub fn h1_count(&self) -> usize {
        self.0
            .pointer("/seo/headings/h1")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// The string entries of `seo.headings.h1`, in order.
    pub fn h1_headings(&self) -> Vec<&str> {
        self.0
            .pointer("/seo/headings/h1")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// `loadTimeMs`
    pub fn load_time_ms(&self) -> Option<f64> {
        self.0.pointer("/loadTimeMs").and_then(Value::as_f64)
    }

    /// `screenshots.desktop`
    pub fn desktop_screenshot(&self) -> Option<&str> {
        self.str_at("/screenshots/desktop")
    }

    /// `screenshots.mobile`
    pub fn mobile_screenshot(&self) -> Option<&str> {
        self.str_at("/screenshots/mobile")
    }

    fn str_at(&self, pointer: &str) -> Option<&str> {
        self.0.pointer(pointer).and_then(Value::as_str)
    }
}

impl From<Value> for AuditReport {
    fn from(raw: Value) -> Self {
        Self::new(raw)
    }
}
