//! Host capabilities consumed by the find controller.
//!
//! The controller never blocks: it asks the host for page text and timers,
//! and the host reports back through
//! [`FindController::page_text_ready`](crate::search::FindController::page_text_ready)
//! and [`FindController::timer_fired`](crate::search::FindController::timer_fired).

use crate::search::bus::FindEvent;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identity of a loaded document. Callbacks carrying another id are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub u64);

/// Handle of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

/// One run of extracted page text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextItem {
    /// The text of the run
    #[serde(rename = "str")]
    pub text: String,
    /// Whether a line ends after this run
    #[serde(rename = "hasEOL", default)]
    pub has_eol: bool,
}

impl TextItem {
    /// Create a text item.
    pub fn new(text: impl Into<String>, has_eol: bool) -> Self {
        Self {
            text: text.into(),
            has_eol,
        }
    }
}

/// Source of per-page text.
///
/// Requests are issued one at a time; the host answers each with
/// `FindController::page_text_ready`, successfully or not, before the next
/// page is requested.
pub trait PageTextProvider {
    /// Start fetching the text of `page_index` (0-based).
    fn request_page_text(&mut self, document: DocumentId, page_index: usize);
}

/// The viewer's page navigation.
pub trait NavigationService {
    /// Currently displayed page (0-based).
    fn current_page(&self) -> usize;

    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Whether `page_index` is at least partly on screen.
    fn is_page_visible(&self, page_index: usize) -> bool;

    /// Scroll to `page_index`.
    fn set_current_page(&mut self, page_index: usize);
}

/// One-shot timers.
pub trait Scheduler {
    /// Schedule a timer; the host calls `FindController::timer_fired` with
    /// the returned handle once `delay` has elapsed.
    fn schedule(&mut self, delay: Duration) -> TimerHandle;

    /// Cancel a timer that has not fired yet.
    fn cancel(&mut self, handle: TimerHandle);
}

/// Sink for find notifications.
pub trait NotificationBus {
    /// Deliver `event` to interested parties.
    fn publish(&mut self, event: FindEvent);
}
