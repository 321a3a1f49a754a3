//! The find controller.
//!
//! Drives text extraction page by page, computes matches as pages become
//! available, keeps the navigation cursor and reports progress on a
//! [`NotificationBus`].
//!
//! The controller is single threaded and host driven. Anything that would
//! suspend is a request to a host capability, answered later by a callback:
//!
//! - page text: [`PageTextProvider::request_page_text`] then
//!   [`FindController::page_text_ready`]
//! - debounce timer: [`Scheduler::schedule`] then [`FindController::timer_fired`]
//!
//! Callbacks carrying a stale document id or timer handle are ignored.

use crate::config::FindOptions;
use crate::error::{Error, Result};
use crate::search::bus::{FindEvent, FindState, MatchesCount};
use crate::search::interfaces::{
    DocumentId, NavigationService, NotificationBus, PageTextProvider, Scheduler, TextItem,
    TimerHandle,
};
use crate::search::page_matches::{PageMatch, PageText};
use crate::search::query::{MatchOptions, PreparedQuery};
use crate::search::request::{FindRequest, OperationType};

/// Navigation cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Page being looked at
    pub page_idx: usize,
    /// Match on that page, `None` before a page's matches were entered
    pub match_idx: Option<usize>,
    /// Whether the cursor crossed the last (or first) page
    pub wrapped: bool,
}

/// The last selected match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Page of the match
    pub page_idx: usize,
    /// Index of the match on the page
    pub match_idx: usize,
}

/// Coarse state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// No document or no query yet
    Idle,
    /// Waiting for page text before anything could be reported
    Extracting,
    /// Waiting for the debounce timer or for the matches of a page
    Pending,
    /// A match is selected
    Matched,
    /// The document has no match
    NotFound,
    /// A match is selected after wrapping around
    Wrapped,
}

/// Incremental find-in-document controller.
pub struct FindController {
    provider: Box<dyn PageTextProvider>,
    navigation: Box<dyn NavigationService>,
    scheduler: Box<dyn Scheduler>,
    bus: Box<dyn NotificationBus>,
    options: FindOptions,

    document: Option<DocumentId>,
    request: Option<FindRequest>,
    query: Option<PreparedQuery>,
    /// A request received before any document, executed on `set_document`.
    parked: Option<Option<OperationType>>,

    pages: Vec<Option<PageText>>,
    page_matches: Vec<Option<Vec<PageMatch>>>,
    pending_find_matches: Vec<bool>,
    extraction_started: bool,
    extracting: Option<usize>,

    selected: Option<Selection>,
    offset: Cursor,
    resume_page_idx: Option<usize>,
    pages_to_search: isize,
    matches_count_total: usize,
    visited_pages_count: usize,

    find_timeout: Option<TimerHandle>,
    dirty_match: bool,
    highlight_matches: bool,
    scroll_matches: bool,
    state: Option<FindState>,
    withheld_state: Option<(FindState, bool)>,
}

impl FindController {
    /// Create a controller without a document.
    pub fn new(
        provider: Box<dyn PageTextProvider>,
        navigation: Box<dyn NavigationService>,
        scheduler: Box<dyn Scheduler>,
        bus: Box<dyn NotificationBus>,
        options: FindOptions,
    ) -> Self {
        Self {
            provider,
            navigation,
            scheduler,
            bus,
            options,
            document: None,
            request: None,
            query: None,
            parked: None,
            pages: Vec::new(),
            page_matches: Vec::new(),
            pending_find_matches: Vec::new(),
            extraction_started: false,
            extracting: None,
            selected: None,
            offset: Cursor::default(),
            resume_page_idx: None,
            pages_to_search: 0,
            matches_count_total: 0,
            visited_pages_count: 0,
            find_timeout: None,
            dirty_match: false,
            highlight_matches: false,
            scroll_matches: false,
            state: None,
            withheld_state: None,
        }
    }

    /// The loaded document.
    pub fn document(&self) -> Option<DocumentId> {
        self.document
    }

    /// Whether matches should currently be highlighted.
    pub fn highlight_matches(&self) -> bool {
        self.highlight_matches
    }

    /// Matches of `page_index` in original text space, once computed.
    pub fn page_matches(&self, page_index: usize) -> Option<&[PageMatch]> {
        self.page_matches.get(page_index)?.as_deref()
    }

    /// Searchable text of `page_index`, once extracted.
    pub fn page_text(&self, page_index: usize) -> Option<&PageText> {
        self.pages.get(page_index)?.as_ref()
    }

    /// The selected match.
    pub fn selected(&self) -> Option<Selection> {
        self.selected
    }

    /// The navigation cursor.
    pub fn cursor(&self) -> Cursor {
        self.offset
    }

    /// The current request.
    pub fn request(&self) -> Option<&FindRequest> {
        self.request.as_ref()
    }

    /// Last result state, published or not.
    pub fn state(&self) -> Option<FindState> {
        self.state
    }

    /// The normalized terms of the current query.
    pub fn normalized_query(&self) -> Result<&[String]> {
        self.query
            .as_ref()
            .map(PreparedQuery::terms)
            .ok_or(Error::QueryNotReady)
    }

    /// Position of the selected match among all matches found so far.
    pub fn matches_count(&self) -> MatchesCount {
        let total = self.matches_count_total;
        let current = self.selected.map_or(0, |sel| {
            let before: usize = self.page_matches[..sel.page_idx]
                .iter()
                .map(|m| m.as_ref().map_or(0, Vec::len))
                .sum();
            before + sel.match_idx + 1
        });
        if current < 1 || current > total {
            return MatchesCount::default();
        }
        MatchesCount { current, total }
    }

    /// Coarse state of the controller.
    pub fn phase(&self) -> SearchPhase {
        if self.document.is_none() || self.request.is_none() {
            return SearchPhase::Idle;
        }
        if self.find_timeout.is_some() || self.resume_page_idx.is_some() {
            return SearchPhase::Pending;
        }
        match self.state {
            Some(FindState::Found) => SearchPhase::Matched,
            Some(FindState::NotFound) => SearchPhase::NotFound,
            Some(FindState::Wrapped) => SearchPhase::Wrapped,
            Some(FindState::Pending) | None if self.extracting.is_some() => SearchPhase::Extracting,
            Some(FindState::Pending) => SearchPhase::Pending,
            None => SearchPhase::Idle,
        }
    }

    /// Load a new document, or unload with `None`.
    ///
    /// Everything derived from a previous document is dropped. A request
    /// received while no document was loaded runs now.
    pub fn set_document(&mut self, document: Option<DocumentId>) -> Result<()> {
        if self.document.is_some() {
            self.reset();
        }
        let Some(document) = document else {
            return Ok(());
        };

        let page_count = self.navigation.page_count();
        log::debug!("Loading document {:?} with {} pages", document, page_count);
        self.document = Some(document);
        self.pages = vec![None; page_count];
        self.page_matches = vec![None; page_count];
        self.pending_find_matches = vec![false; page_count];

        match self.parked.take() {
            Some(operation) => self.execute_find(operation),
            None => Ok(()),
        }
    }

    fn reset(&mut self) {
        if let Some(handle) = self.find_timeout.take() {
            self.scheduler.cancel(handle);
        }
        self.document = None;
        self.request = None;
        self.query = None;
        self.parked = None;
        self.pages.clear();
        self.page_matches.clear();
        self.pending_find_matches.clear();
        self.extraction_started = false;
        self.extracting = None;
        self.selected = None;
        self.offset = Cursor::default();
        self.resume_page_idx = None;
        self.pages_to_search = 0;
        self.matches_count_total = 0;
        self.visited_pages_count = 0;
        self.dirty_match = false;
        self.highlight_matches = false;
        self.scroll_matches = false;
        self.state = None;
        self.withheld_state = None;
    }

    /// Handle a find request.
    pub fn find(&mut self, mut request: FindRequest) -> Result<()> {
        if let Some(diagnostic) = request.coerce_phrase_search() {
            log::warn!("{}", diagnostic);
        }
        let operation = request.operation;

        if self.request.is_none() || self.should_dirty_match(&request) {
            self.dirty_match = true;
        }
        self.set_request(request);

        if operation != Some(OperationType::HighlightAllChange) {
            self.update_ui_state(FindState::Pending, false);
        }

        if self.document.is_none() {
            log::debug!("No document loaded, deferring find request");
            self.parked = Some(operation);
            return Ok(());
        }
        self.execute_find(operation)
    }

    fn set_request(&mut self, request: FindRequest) {
        let options = MatchOptions {
            case_sensitive: request.case_sensitive,
            match_diacritics: request.match_diacritics,
        };
        let unchanged = self.request.as_ref().is_some_and(|prev| {
            prev.query == request.query
                && prev.case_sensitive == request.case_sensitive
                && prev.match_diacritics == request.match_diacritics
        });
        if !unchanged || self.query.is_none() {
            self.query = Some(PreparedQuery::new(&request.query, options));
        }
        self.request = Some(request);
    }

    fn should_dirty_match(&self, request: &FindRequest) -> bool {
        let Some(prev) = &self.request else {
            return true;
        };
        if request.query != prev.query {
            return true;
        }
        match request.operation {
            Some(OperationType::Again) => self.selected.is_some_and(|sel| {
                sel.page_idx < self.navigation.page_count()
                    && sel.page_idx != self.navigation.current_page()
                    && !self.navigation.is_page_visible(sel.page_idx)
            }),
            Some(OperationType::HighlightAllChange) => false,
            _ => true,
        }
    }

    fn execute_find(&mut self, operation: Option<OperationType>) -> Result<()> {
        self.start_extraction();

        let findbar_closed = !self.highlight_matches;
        let pending_timeout = match self.find_timeout.take() {
            Some(handle) => {
                self.scheduler.cancel(handle);
                true
            },
            None => false,
        };

        match operation {
            None => {
                self.find_timeout = Some(self.scheduler.schedule(self.options.find_timeout));
                Ok(())
            },
            _ if self.dirty_match => self.next_match(),
            Some(OperationType::Again) => {
                self.next_match()?;
                if findbar_closed && self.highlight_all() {
                    self.update_all_pages();
                }
                Ok(())
            },
            Some(OperationType::HighlightAllChange) => {
                if pending_timeout {
                    self.next_match()?;
                } else {
                    self.highlight_matches = true;
                }
                self.update_all_pages();
                Ok(())
            },
            Some(_) => self.next_match(),
        }
    }

    /// Debounce timer callback.
    pub fn timer_fired(&mut self, handle: TimerHandle) -> Result<()> {
        if self.find_timeout != Some(handle) {
            log::debug!("Ignoring stale timer {:?}", handle);
            return Ok(());
        }
        self.find_timeout = None;
        self.next_match()
    }

    /// Page text callback, answering a `request_page_text` call.
    ///
    /// A failed extraction leaves the page empty; it simply has no matches.
    pub fn page_text_ready(
        &mut self,
        document: DocumentId,
        page_index: usize,
        result: Result<Vec<TextItem>>,
    ) -> Result<()> {
        if self.document != Some(document) {
            log::debug!("Ignoring text of page {} from stale document {:?}", page_index, document);
            return Ok(());
        }
        if self.extracting != Some(page_index) {
            log::debug!("Ignoring unrequested text of page {}", page_index);
            return Ok(());
        }

        let page = match result {
            Ok(items) => PageText::from_items(&items),
            Err(err) => {
                log::error!("Unable to get text content for page {}: {}", page_index, err);
                PageText::empty()
            },
        };
        self.pages[page_index] = Some(page);
        self.request_page(document, page_index + 1);

        if self.pending_find_matches[page_index] {
            self.pending_find_matches[page_index] = false;
            self.calculate_match(page_index)?;
        }
        Ok(())
    }

    /// The find bar was closed.
    ///
    /// Cached page text and matches survive, so reopening is cheap.
    pub fn close(&mut self) {
        if self.document.is_none() {
            return;
        }
        if let Some(handle) = self.find_timeout.take() {
            self.scheduler.cancel(handle);
        }
        if let Some(page) = self.resume_page_idx.take() {
            log::debug!("Abandoning wait for matches of page {}", page);
            self.dirty_match = true;
        }
        self.update_ui_state(FindState::Found, false);
        // Nothing is reported for a closed find bar once the scan completes.
        self.withheld_state = None;
        self.highlight_matches = false;
        self.update_all_pages();
    }

    fn start_extraction(&mut self) {
        if self.extraction_started {
            return;
        }
        let Some(document) = self.document else {
            return;
        };
        self.extraction_started = true;
        self.request_page(document, 0);
    }

    fn request_page(&mut self, document: DocumentId, page_index: usize) {
        if page_index < self.pages.len() {
            self.extracting = Some(page_index);
            self.provider.request_page_text(document, page_index);
        } else {
            log::debug!("Text extraction finished for {} pages", self.pages.len());
            self.extracting = None;
        }
    }

    fn highlight_all(&self) -> bool {
        self.request.as_ref().is_some_and(|r| r.highlight_all)
    }

    fn find_previous(&self) -> bool {
        self.request.as_ref().is_some_and(|r| r.find_previous)
    }

    fn calculate_match(&mut self, page_index: usize) -> Result<()> {
        let entire_word = self.request.as_ref().is_some_and(|r| r.entire_word);
        let matches = match (self.pages[page_index].as_ref(), self.query.as_mut()) {
            (Some(page), Some(query)) if !query.is_empty() => match query.pattern(page.has_diacritics()) {
                Ok(pattern) => page.compute_matches(pattern, entire_word),
                Err(err) => {
                    log::warn!("No matches on page {}: {}", page_index, err);
                    Vec::new()
                },
            },
            _ => Vec::new(),
        };
        let page_matches_count = matches.len();
        self.page_matches[page_index] = Some(matches);

        if self.highlight_all() {
            self.update_page(page_index);
        }

        let resumed = if self.resume_page_idx == Some(page_index) {
            self.resume_page_idx = None;
            self.next_page_match()
        } else {
            Ok(())
        };

        self.matches_count_total += page_matches_count;
        if self.options.update_matches_count_on_progress {
            if page_matches_count > 0 {
                self.update_ui_results_count();
            }
        } else {
            self.visited_pages_count += 1;
            if self.visited_pages_count == self.pages.len() {
                self.update_ui_results_count();
                if let Some((state, previous)) = self.withheld_state.take() {
                    self.update_ui_state(state, previous);
                }
            }
        }

        resumed
    }

    /// Compute matches for pages that were extracted before they were needed.
    fn compute_ready_pages(&mut self) -> Result<()> {
        for page_index in 0..self.pages.len() {
            if self.pending_find_matches[page_index] && self.pages[page_index].is_some() {
                self.pending_find_matches[page_index] = false;
                self.calculate_match(page_index)?;
            }
        }
        Ok(())
    }

    fn next_match(&mut self) -> Result<()> {
        let page_count = self.pages.len();
        self.highlight_matches = true;

        if page_count == 0 {
            self.update_ui_state(FindState::NotFound, self.find_previous());
            return Ok(());
        }

        if self.dirty_match {
            self.dirty_match = false;
            self.selected = None;
            self.offset = Cursor {
                page_idx: self.navigation.current_page().min(page_count - 1),
                match_idx: None,
                wrapped: false,
            };
            self.resume_page_idx = None;
            self.page_matches.iter_mut().for_each(|m| *m = None);
            self.visited_pages_count = 0;
            self.matches_count_total = 0;
            self.withheld_state = None;
            self.update_all_pages();
            self.pending_find_matches.iter_mut().for_each(|p| *p = true);
        }

        let navigated = self.navigate(page_count);
        self.compute_ready_pages()?;
        navigated
    }

    fn navigate(&mut self, page_count: usize) -> Result<()> {
        if self.query.as_ref().map_or(true, PreparedQuery::is_empty) {
            self.update_ui_state(FindState::Found, false);
            return Ok(());
        }
        if let Some(pending) = self.resume_page_idx {
            return Err(Error::ConcurrentResume {
                pending,
                requested: self.offset.page_idx,
            });
        }

        let previous = self.find_previous();
        self.pages_to_search = page_count as isize;

        if let Some(match_idx) = self.offset.match_idx {
            let num_page_matches = self.page_matches(self.offset.page_idx).map_or(0, <[_]>::len);
            if (!previous && match_idx + 1 < num_page_matches) || (previous && match_idx > 0) {
                self.offset.match_idx = Some(if previous { match_idx - 1 } else { match_idx + 1 });
                self.update_match(true);
                return Ok(());
            }
            self.advance_offset_page(previous);
        }
        self.next_page_match()
    }

    fn next_page_match(&mut self) -> Result<()> {
        loop {
            let page_idx = self.offset.page_idx;
            let Some(num_matches) = self.page_matches(page_idx).map(<[_]>::len) else {
                if let Some(pending) = self.resume_page_idx {
                    return Err(Error::ConcurrentResume {
                        pending,
                        requested: page_idx,
                    });
                }
                log::debug!("Waiting for matches of page {}", page_idx);
                self.resume_page_idx = Some(page_idx);
                return Ok(());
            };
            if self.matches_ready(num_matches) {
                return Ok(());
            }
        }
    }

    fn matches_ready(&mut self, num_matches: usize) -> bool {
        let previous = self.find_previous();
        if num_matches > 0 {
            self.offset.match_idx = Some(if previous { num_matches - 1 } else { 0 });
            self.update_match(true);
            return true;
        }

        self.advance_offset_page(previous);
        if self.offset.wrapped {
            self.offset.match_idx = None;
            if self.pages_to_search < 0 {
                self.update_match(false);
                return true;
            }
        }
        false
    }

    fn advance_offset_page(&mut self, previous: bool) {
        let page_count = self.pages.len();
        let offset = &mut self.offset;
        offset.match_idx = None;
        self.pages_to_search -= 1;

        let next = if previous {
            offset.page_idx.checked_sub(1)
        } else {
            Some(offset.page_idx + 1).filter(|&p| p < page_count)
        };
        match next {
            Some(page) => offset.page_idx = page,
            None => {
                offset.page_idx = if previous { page_count - 1 } else { 0 };
                offset.wrapped = true;
            },
        }
    }

    fn update_match(&mut self, found: bool) {
        let wrapped = std::mem::take(&mut self.offset.wrapped);
        let mut state = FindState::NotFound;

        if found {
            if let Some(match_idx) = self.offset.match_idx {
                let previous_page = self.selected.map(|sel| sel.page_idx);
                self.selected = Some(Selection {
                    page_idx: self.offset.page_idx,
                    match_idx,
                });
                state = if wrapped { FindState::Wrapped } else { FindState::Found };
                if let Some(page) = previous_page.filter(|&p| p != self.offset.page_idx) {
                    self.update_page(page);
                }
            }
        }

        self.update_ui_state(state, self.find_previous());
        if let Some(sel) = self.selected {
            self.scroll_matches = true;
            self.update_page(sel.page_idx);
        }
    }

    fn update_page(&mut self, page_index: usize) {
        if self.scroll_matches && self.selected.is_some_and(|sel| sel.page_idx == page_index) {
            self.scroll_matches = false;
            self.navigation.set_current_page(page_index);
        }
        self.bus.publish(FindEvent::MatchesUpdated {
            page_index: Some(page_index),
        });
    }

    fn update_all_pages(&mut self) {
        self.bus.publish(FindEvent::MatchesUpdated { page_index: None });
    }

    fn update_ui_results_count(&mut self) {
        let matches_count = self.matches_count();
        self.bus.publish(FindEvent::MatchesCountUpdated { matches_count });
    }

    fn update_ui_state(&mut self, state: FindState, previous: bool) {
        self.state = Some(state);
        if !self.options.update_matches_count_on_progress
            && (self.visited_pages_count != self.pages.len() || state == FindState::Pending)
        {
            if state != FindState::Pending {
                self.withheld_state = Some((state, previous));
            }
            return;
        }
        let event = FindEvent::ResultStateChanged {
            state,
            previous,
            matches_count: self.matches_count(),
            raw_query: self.request.as_ref().map(|r| r.query.clone()),
        };
        self.bus.publish(event);
    }
}

impl std::fmt::Debug for FindController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FindController")
            .field("document", &self.document)
            .field("request", &self.request)
            .field("selected", &self.selected)
            .field("offset", &self.offset)
            .field("resume_page_idx", &self.resume_page_idx)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::bus::EventBus;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    #[derive(Default)]
    struct Host {
        requested: Vec<usize>,
        timers: Vec<TimerHandle>,
        next_timer: u64,
        current_page: usize,
        scrolled_to: Vec<usize>,
    }

    struct Shared(Rc<RefCell<Host>>, usize);

    impl PageTextProvider for Shared {
        fn request_page_text(&mut self, _document: DocumentId, page_index: usize) {
            self.0.borrow_mut().requested.push(page_index);
        }
    }

    impl NavigationService for Shared {
        fn current_page(&self) -> usize {
            self.0.borrow().current_page
        }
        fn page_count(&self) -> usize {
            self.1
        }
        fn is_page_visible(&self, page_index: usize) -> bool {
            page_index == self.0.borrow().current_page
        }
        fn set_current_page(&mut self, page_index: usize) {
            let mut host = self.0.borrow_mut();
            host.current_page = page_index;
            host.scrolled_to.push(page_index);
        }
    }

    impl Scheduler for Shared {
        fn schedule(&mut self, _delay: Duration) -> TimerHandle {
            let mut host = self.0.borrow_mut();
            host.next_timer += 1;
            let handle = TimerHandle(host.next_timer);
            host.timers.push(handle);
            handle
        }
        fn cancel(&mut self, handle: TimerHandle) {
            self.0.borrow_mut().timers.retain(|&t| t != handle);
        }
    }

    fn controller(pages: usize) -> (FindController, Rc<RefCell<Host>>, Rc<RefCell<Vec<FindEvent>>>) {
        let host = Rc::new(RefCell::new(Host::default()));
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        {
            let events = Rc::clone(&events);
            bus.subscribe(move |e| events.borrow_mut().push(e.clone()));
        }
        let controller = FindController::new(
            Box::new(Shared(Rc::clone(&host), pages)),
            Box::new(Shared(Rc::clone(&host), pages)),
            Box::new(Shared(Rc::clone(&host), pages)),
            Box::new(bus),
            FindOptions::default(),
        );
        (controller, host, events)
    }

    const DOC: DocumentId = DocumentId(1);

    fn deliver(controller: &mut FindController, page: usize, text: &str) {
        controller
            .page_text_ready(DOC, page, Ok(vec![TextItem::new(text, false)]))
            .unwrap();
    }

    #[test]
    fn test_idle_without_document() {
        let (controller, _, _) = controller(2);
        assert_eq!(controller.phase(), SearchPhase::Idle);
        assert!(matches!(controller.normalized_query(), Err(Error::QueryNotReady)));
    }

    #[test]
    fn test_extraction_is_serialized() {
        let (mut controller, host, _) = controller(3);
        controller.set_document(Some(DOC)).unwrap();
        controller
            .find(FindRequest::new("x").with_operation(OperationType::Again))
            .unwrap();
        assert_eq!(host.borrow().requested, vec![0]);
        assert_eq!(controller.phase(), SearchPhase::Pending);

        deliver(&mut controller, 0, "x");
        assert_eq!(host.borrow().requested, vec![0, 1]);
        assert_eq!(controller.selected(), Some(Selection { page_idx: 0, match_idx: 0 }));
        assert_eq!(controller.phase(), SearchPhase::Matched);

        // Out-of-order text is ignored.
        deliver(&mut controller, 2, "x");
        assert!(controller.page_text(2).is_none());
    }

    #[test]
    fn test_stale_document_is_ignored() {
        let (mut controller, host, _) = controller(1);
        controller.set_document(Some(DOC)).unwrap();
        controller
            .find(FindRequest::new("x").with_operation(OperationType::Again))
            .unwrap();
        controller
            .page_text_ready(DocumentId(99), 0, Ok(vec![TextItem::new("x", false)]))
            .unwrap();
        assert!(controller.page_text(0).is_none());
        assert_eq!(host.borrow().requested, vec![0]);
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let (mut controller, _, events) = controller(1);
        controller.set_document(Some(DOC)).unwrap();
        controller.find(FindRequest::new("x")).unwrap();
        let before = events.borrow().len();
        controller.timer_fired(TimerHandle(12345)).unwrap();
        assert_eq!(events.borrow().len(), before);
    }

    #[test]
    fn test_selected_page_is_scrolled_into_view() {
        let (mut controller, host, _) = controller(2);
        controller.set_document(Some(DOC)).unwrap();
        controller
            .find(FindRequest::new("needle").with_operation(OperationType::Again))
            .unwrap();
        deliver(&mut controller, 0, "hay");
        deliver(&mut controller, 1, "needle");
        assert_eq!(controller.selected(), Some(Selection { page_idx: 1, match_idx: 0 }));
        assert_eq!(host.borrow().scrolled_to, vec![1]);
    }

    #[test]
    fn test_normalized_query() {
        let (mut controller, _, _) = controller(1);
        controller.set_document(Some(DOC)).unwrap();
        controller
            .find(FindRequest::new("\u{FB01}x").with_operation(OperationType::Again))
            .unwrap();
        assert_eq!(controller.normalized_query().unwrap(), &["fix".to_string()]);
    }

    #[test]
    fn test_unload_document() {
        let (mut controller, _, _) = controller(1);
        controller.set_document(Some(DOC)).unwrap();
        controller
            .find(FindRequest::new("x").with_operation(OperationType::Again))
            .unwrap();
        controller.set_document(None).unwrap();
        assert_eq!(controller.document(), None);
        assert!(controller.request().is_none());
        assert_eq!(controller.phase(), SearchPhase::Idle);
    }
}
