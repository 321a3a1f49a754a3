//! Error types for the find subsystem.
//!
//! Most failures are recovered close to where they happen (a page whose text
//! could not be extracted simply has no matches). The variants that escape to
//! callers are invariant violations and malformed input.

/// Result type alias for find operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while searching a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Text content for a page could not be fetched
    #[error("Unable to get text content for page {page_index}: {reason}")]
    ExtractionFailed {
        /// Zero-based page index
        page_index: usize,
        /// Reason reported by the text provider
        reason: String,
    },

    /// Navigation tried to wait on a second page while one is still outstanding
    #[error("Only one pending page is allowed: page {pending} is outstanding, page {requested} was requested")]
    ConcurrentResume {
        /// Page whose matches are already awaited
        pending: usize,
        /// Page that would have become a second resume page
        requested: usize,
    },

    /// The controller was asked to search before any query was set
    #[error("Query state accessed before a find request was received")]
    QueryNotReady,

    /// Deprecated or inconsistent request parameters
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    /// The compiled search pattern was rejected by the regex engine
    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A find request could not be decoded
    #[error("Invalid find request: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_failed_error() {
        let err = Error::ExtractionFailed {
            page_index: 3,
            reason: "stream closed".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("page 3"));
        assert!(msg.contains("stream closed"));
    }

    #[test]
    fn test_concurrent_resume_error() {
        let err = Error::ConcurrentResume {
            pending: 1,
            requested: 2,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("page 1 is outstanding"));
        assert!(msg.contains("page 2 was requested"));
    }

    #[test]
    fn test_invalid_pattern_from_regex() {
        let regex_err = regex::Regex::new("(").unwrap_err();
        let err: Error = regex_err.into();
        assert!(matches!(err, Error::InvalidPattern(_)));
        assert!(format!("{}", err).starts_with("Invalid search pattern"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
