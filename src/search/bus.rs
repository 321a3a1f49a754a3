//! Find notifications and an in-process publish/subscribe bus.

use crate::search::interfaces::NotificationBus;
use crate::search::request::Query;
use serde::Serialize;

/// Result state reported to the find bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FindState {
    /// A match is selected
    Found,
    /// The whole document was searched without a match
    NotFound,
    /// A match is selected after wrapping past the end (or start)
    Wrapped,
    /// A search is in progress
    Pending,
}

/// Position of the selected match among all matches, 1-based.
///
/// `{0, 0}` when nothing is selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchesCount {
    /// Index of the selected match
    pub current: usize,
    /// Matches found so far
    pub total: usize,
}

/// Notification published by the find controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FindEvent {
    /// Highlights of one page (or of every page, for `None`) must be redrawn
    #[serde(rename_all = "camelCase")]
    MatchesUpdated {
        /// Page to redraw, `None` for all pages
        page_index: Option<usize>,
    },
    /// The result state changed
    #[serde(rename_all = "camelCase")]
    ResultStateChanged {
        /// New state
        state: FindState,
        /// Whether the search ran backwards
        previous: bool,
        /// Selected match position
        matches_count: MatchesCount,
        /// The query as received
        raw_query: Option<Query>,
    },
    /// The running match count changed
    #[serde(rename_all = "camelCase")]
    MatchesCountUpdated {
        /// Selected match position
        matches_count: MatchesCount,
    },
}

/// Subscription handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&FindEvent)>;

/// Synchronous event bus; listeners run in subscription order.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl EventBus {
    /// Create a bus without listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&FindEvent) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl NotificationBus for EventBus {
    fn publish(&mut self, event: FindEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
