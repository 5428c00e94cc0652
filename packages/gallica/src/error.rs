//! Error types for the Gallica client.
//!
//! `GallicaError` carries the detailed failure for library consumers, and
//! [`ErrorKind`] collapses it into the five kinds callers branch on.

use std::fmt;

use thiserror::Error;

/// Coarse classification of a [`GallicaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed caller input, or a request the provider rejected as bad.
    InvalidArgument,
    /// The provider has no resource for the identifier.
    NotFound,
    /// Network failure or an unexpected non-success status.
    Transport,
    /// The payload does not have the shape expected for its format.
    Decode,
    /// A structured table of contents parsed without a single row.
    EmptyResult,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid argument",
            Self::NotFound => "not found",
            Self::Transport => "transport error",
            Self::Decode => "decode error",
            Self::EmptyResult => "empty result",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for the Gallica client library.
#[derive(Debug, Error)]
pub enum GallicaError {
    /// Invalid caller input (identifier, image parameters).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The provider answered 400 for a request.
    #[error("Bad request for {url}, the ark parameter might be missing or malformed")]
    BadRequest { url: String },

    /// The provider answered 404 for a request.
    #[error("Document not found at {url}, it might not be indexed in Gallica")]
    NotFound { url: String },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status other than 400/404.
    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// JSON parsing or serialization failed.
    #[error("JSON processing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Missing required field in a decoded payload.
    #[error("Missing required field: {path}")]
    MissingField { path: String },

    /// A field is present but has the wrong type.
    #[error("Unexpected value at {path}: expected {expected}")]
    UnexpectedShape {
        path: String,
        expected: &'static str,
    },

    /// A field has the right type but an unusable value.
    #[error("Invalid value at {path}: {message}")]
    InvalidValue { path: String, message: String },

    /// The table of contents is neither TEI nor HTML.
    #[error("Unknown table of contents format <{0}>, expected TEI or HTML")]
    UnknownTocFormat(String),

    /// A TEI table of contents without any row.
    #[error("There were no entries in the table of contents of {0}")]
    EmptyToc(String),
}

impl GallicaError {
    /// Classify this error into one of the five [`ErrorKind`]s.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) | Self::BadRequest { .. } => ErrorKind::InvalidArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Http(_) | Self::UnexpectedStatus { .. } => ErrorKind::Transport,
            Self::Json(_)
            | Self::XmlParse(_)
            | Self::MissingField { .. }
            | Self::UnexpectedShape { .. }
            | Self::InvalidValue { .. }
            | Self::UnknownTocFormat(_) => ErrorKind::Decode,
            Self::EmptyToc(_) => ErrorKind::EmptyResult,
        }
    }
}

/// Result type alias for Gallica client operations.
pub type Result<T> = std::result::Result<T, GallicaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GallicaError::MissingField {
            path: "$.sequences".to_string(),
        };
        assert_eq!(err.to_string(), "Missing required field: $.sequences");

        let err = GallicaError::UnexpectedShape {
            path: "$.metadata[0].value".to_string(),
            expected: "string",
        };
        assert_eq!(
            err.to_string(),
            "Unexpected value at $.metadata[0].value: expected string"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            GallicaError::InvalidArgument("ark".into()).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            GallicaError::BadRequest { url: "u".into() }.kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            GallicaError::NotFound { url: "u".into() }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            GallicaError::UnexpectedStatus {
                status: 503,
                url: "u".into()
            }
            .kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            GallicaError::UnknownTocFormat("rss".into()).kind(),
            ErrorKind::Decode
        );
        assert_eq!(
            GallicaError::EmptyToc("bpt6k".into()).kind(),
            ErrorKind::EmptyResult
        );
    }

    #[test]
    fn test_json_error_is_decode() {
        let err: GallicaError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::EmptyResult.to_string(), "empty result");
    }
}
