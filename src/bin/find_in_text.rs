//! Find in Text
//!
//! Searches a text file whose pages are separated by form feeds and prints
//! every match in navigation order as `page:offset:length:text` (page is
//! 1-based, offset and length count characters of the page).
//!
//! Usage:
//!   cargo run --release --bin find_in_text -- <file> <query>
//!   cargo run --release --bin find_in_text -- <file> <query> --entire-word --previous
//!
//! Set `RUST_LOG=debug` to trace the controller.

use pdf_find::search::{
    DocumentId, EventBus, FindController, FindRequest, NavigationService, OperationType,
    PageTextProvider, Scheduler, TextItem, TimerHandle,
};
use pdf_find::{Error, FindOptions};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

const PAGE_SEPARATOR: char = '\u{000C}';

struct FindConfig {
    path: PathBuf,
    query: String,
    case_sensitive: bool,
    entire_word: bool,
    match_diacritics: bool,
    previous: bool,
}

impl FindConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut positional = Vec::new();
        let mut case_sensitive = false;
        let mut entire_word = false;
        let mut match_diacritics = false;
        let mut previous = false;

        for arg in args.iter().skip(1) {
            match arg.as_str() {
                "--case-sensitive" => case_sensitive = true,
                "--entire-word" => entire_word = true,
                "--match-diacritics" => match_diacritics = true,
                "--previous" => previous = true,
                flag if flag.starts_with("--") => return Err(format!("Unknown option: {}", flag)),
                _ => positional.push(arg.clone()),
            }
        }

        let [path, query]: [String; 2] = positional
            .try_into()
            .map_err(|_| "Expected exactly two arguments: <file> <query>".to_string())?;

        Ok(Self {
            path: PathBuf::from(path),
            query,
            case_sensitive,
            entire_word,
            match_diacritics,
            previous,
        })
    }

    fn request(&self) -> FindRequest {
        FindRequest::new(self.query.as_str())
            .with_operation(OperationType::Again)
            .with_case_sensitive(self.case_sensitive)
            .with_entire_word(self.entire_word)
            .with_match_diacritics(self.match_diacritics)
            .with_find_previous(self.previous)
    }
}

/// Split a file into pages of text items, one item per line.
fn load_pages(text: &str) -> Vec<Vec<TextItem>> {
    text.split(PAGE_SEPARATOR)
        .map(|page| {
            let lines: Vec<&str> = page.lines().collect();
            lines
                .iter()
                .enumerate()
                .map(|(i, line)| TextItem::new(*line, i + 1 < lines.len()))
                .collect()
        })
        .collect()
}

/// Hosts answering synchronously from memory.
#[derive(Default)]
struct LocalHost {
    requests: VecDeque<(DocumentId, usize)>,
    next_timer: u64,
    page_count: usize,
    current_page: usize,
}

#[derive(Clone)]
struct SharedHost(Rc<RefCell<LocalHost>>);

impl PageTextProvider for SharedHost {
    fn request_page_text(&mut self, document: DocumentId, page_index: usize) {
        self.0.borrow_mut().requests.push_back((document, page_index));
    }
}

impl NavigationService for SharedHost {
    fn current_page(&self) -> usize {
        self.0.borrow().current_page
    }

    fn page_count(&self) -> usize {
        self.0.borrow().page_count
    }

    fn is_page_visible(&self, page_index: usize) -> bool {
        page_index == self.0.borrow().current_page
    }

    fn set_current_page(&mut self, page_index: usize) {
        self.0.borrow_mut().current_page = page_index;
    }
}

impl Scheduler for SharedHost {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        // Only explicit operations are sent, so timers are never awaited.
        let mut host = self.0.borrow_mut();
        host.next_timer += 1;
        log::debug!("Timer {} scheduled for {:?}", host.next_timer, delay);
        TimerHandle(host.next_timer)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        log::debug!("Timer {:?} cancelled", handle);
    }
}

fn pump(
    controller: &mut FindController,
    host: &Rc<RefCell<LocalHost>>,
    pages: &[Vec<TextItem>],
) -> Result<(), Error> {
    loop {
        let next = host.borrow_mut().requests.pop_front();
        let Some((document, page_index)) = next else {
            return Ok(());
        };
        let items = pages.get(page_index).cloned().ok_or_else(|| Error::ExtractionFailed {
            page_index,
            reason: "page out of range".to_string(),
        });
        controller.page_text_ready(document, page_index, items)?;
    }
}

fn run(config: &FindConfig) -> Result<usize, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(&config.path)?;
    let pages = load_pages(&text);
    log::info!("Loaded {} pages from {}", pages.len(), config.path.display());

    let host = Rc::new(RefCell::new(LocalHost {
        page_count: pages.len(),
        ..Default::default()
    }));
    let mut bus = EventBus::new();
    bus.subscribe(|event| {
        if let Ok(json) = serde_json::to_string(event) {
            log::debug!("Event: {}", json);
        }
    });

    let mut controller = FindController::new(
        Box::new(SharedHost(Rc::clone(&host))),
        Box::new(SharedHost(Rc::clone(&host))),
        Box::new(SharedHost(Rc::clone(&host))),
        Box::new(bus),
        FindOptions::default(),
    );
    controller.set_document(Some(DocumentId(1)))?;

    let request = config.request();
    controller.find(request.clone())?;
    pump(&mut controller, &host, &pages)?;

    let Some(first) = controller.selected() else {
        return Ok(0);
    };
    let total = controller.matches_count().total;

    let mut selection = first;
    for _ in 0..total {
        let page = controller.page_text(selection.page_idx);
        let found = controller
            .page_matches(selection.page_idx)
            .and_then(|matches| matches.get(selection.match_idx));
        if let (Some(page), Some(m)) = (page, found) {
            println!(
                "{}:{}:{}:{}",
                selection.page_idx + 1,
                m.offset,
                m.length,
                page.original_slice(m)
            );
        }

        controller.find(request.clone())?;
        match controller.selected() {
            Some(next) if next != first => selection = next,
            _ => break,
        }
    }

    Ok(total)
}

fn main() {
    env_logger::init();

    let config = match FindConfig::from_args() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!(
                "Usage: find_in_text <file> <query> [--case-sensitive] [--entire-word] [--match-diacritics] [--previous]"
            );
            std::process::exit(2);
        },
    };

    match run(&config) {
        Ok(0) => {
            eprintln!("No matches for '{}'", config.query);
            std::process::exit(1);
        },
        Ok(total) => log::info!("{} matches", total),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        },
    }
}
