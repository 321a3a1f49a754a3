//! Incremental find-in-document.
//!
//! The pieces, leaves first:
//! - [`request`]: find requests as sent by the host
//! - [`query`]: turns a query into a pattern over normalized text
//! - [`page_matches`]: per-page text and match computation
//! - [`FindController`]: extraction, navigation and notifications
//!
//! ## Example
//!
//! ```
//! use pdf_find::search::page_matches::PageText;
//! use pdf_find::search::query::{compile, MatchOptions};
//! use pdf_find::search::Query;
//!
//! let page = PageText::from_raw("Un café, s'il vous plaît.");
//! let pattern = compile(&Query::from("cafe"), MatchOptions::default(), page.has_diacritics())?;
//! let matches = page.compute_matches(&pattern, true);
//! assert_eq!(matches.len(), 1);
//! assert_eq!(page.original_slice(&matches[0]), "café");
//! # Ok::<(), pdf_find::Error>(())
//! ```

pub mod bus;
pub mod controller;
pub mod interfaces;
pub mod page_matches;
pub mod query;
pub mod request;

pub use bus::{EventBus, FindEvent, FindState, ListenerId, MatchesCount};
pub use controller::{Cursor, FindController, SearchPhase, Selection};
pub use interfaces::{
    DocumentId, NavigationService, NotificationBus, PageTextProvider, Scheduler, TextItem,
    TimerHandle,
};
pub use page_matches::{PageMatch, PageText};
pub use request::{FindRequest, OperationType, Query};
