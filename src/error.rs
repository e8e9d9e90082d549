use crate::document::Document;

/// Error returned when a layout configuration cannot be turned into a
/// working layout. Raised once at build time, never per event.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid timestamp format `{pattern}`")]
    InvalidTimestampFormat { pattern: String },

    #[error("unknown time zone `{name}`")]
    UnknownTimeZone { name: String },
}

/// Error returned when a document cannot be rendered as JSON.
///
/// Documents assembled from the field catalogs always encode, so hitting
/// this means a builder put something unrenderable into the document.
#[derive(thiserror::Error, Debug)]
#[error("unable to format document as JSON")]
pub struct EncodingError {
    /// The document that failed to encode.
    pub document: Document,
    #[source]
    pub source: serde_json::Error,
}
