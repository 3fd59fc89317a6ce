use std::time::Duration;

use thiserror::Error;

/// A single field could not be extracted from the page.
#[derive(Debug, Error)]
pub enum FieldError {
    /// The structural element the locator points at is missing: layout
    /// mismatch, card not found, or a page variant that differs.
    #[error("element not found: {locator}")]
    NotFound { locator: &'static str },

    /// The field should be numeric but did not parse after separator removal.
    #[error("expected a number, got '{text}'")]
    NotNumeric { text: String },
}

/// First field failure while assembling a record, with enough context
/// (card name + field) to be actionable. The whole record is dropped.
#[derive(Debug, Error)]
#[error("card '{card}': field '{field}': {source}")]
pub struct AssemblyError {
    pub card: String,
    pub field: &'static str,
    pub source: FieldError,
}

/// The page failed to load or never became ready within the wait bound.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("page did not become ready within {timeout:?}: {url}")]
    Timeout { url: String, timeout: Duration },

    #[error("webdriver request failed for {url}")]
    WebDriver {
        url: String,
        #[source]
        source: thirtyfour::error::WebDriverError,
    },
}

/// Unsupported engine name. Fatal at startup, before any network activity.
#[derive(Debug, Error)]
#[error("unsupported engine '{0}' (expected chrome, edge or firefox)")]
pub struct ConfigError(pub String);
