// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::needless_range_loop)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Find
//!
//! Find-in-document for paginated viewers: incremental, cancellable and
//! Unicode aware, with exact mapping of every match back to the extracted
//! page text.
//!
//! ## Core Features
//!
//! - **Normalization**: canonical decomposition, compatibility forms, quote
//!   and fraction substitutions, hyphenation and line-break joining
//! - **Offset Mapping**: compact diff tables translate normalized offsets to
//!   original character offsets
//! - **Matching**: case-insensitive, diacritic-insensitive, whole-word and
//!   phrase-list queries
//! - **Coordination**: serialized page extraction, debounced typing,
//!   wrap-around navigation and match counting
//!
//! ## Architecture
//!
//! The controller never blocks. Page text, timers, navigation and
//! notifications are host capabilities behind traits
//! ([`search::PageTextProvider`], [`search::Scheduler`],
//! [`search::NavigationService`], [`search::NotificationBus`]); the host
//! answers asynchronous requests through callbacks.
//!
//! ## Quick Start
//!
//! ```
//! use pdf_find::text::normalize;
//!
//! let normalized = normalize("e\u{FB03}cient hyphen-\nation");
//! assert_eq!(normalized.text, "efficient hyphenation");
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Text normalization
pub mod text;

// Find controller
pub mod search;

// Re-exports
pub use config::FindOptions;
pub use error::{Error, Result};
pub use search::{FindController, FindRequest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        // VERSION is populated from CARGO_PKG_VERSION at compile time
        assert!(VERSION.starts_with("0."));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "pdf_find");
    }
}
