//! In-memory fakes shared by the integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use seatwatch::bot::{CommandChannel, IncomingMessage, Notifier};
use seatwatch::portal::slots::SlotDefinition;
use seatwatch::portal::{AuthError, CoursePortal, FetchError, SlotListings};

/// Notifier that records every message sent.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: RefCell<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, text: &str) {
        self.sent.borrow_mut().push(text.to_string());
    }
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.sent
            .borrow()
            .iter()
            .filter(|m| m.contains(needle))
            .count()
    }
}

/// Scripted outcome for one slot fetch.
#[derive(Clone)]
pub enum SlotOutcome {
    Markup(String),
    /// Non-success HTTP status: nothing to report.
    Empty,
    NetworkError(String),
}

/// Portal fake: scripted login outcome plus per-slot listing outcomes,
/// recording the order slots were fetched in.
pub struct FakePortal {
    login_error: Option<fn() -> AuthError>,
    listings: HashMap<&'static str, SlotOutcome>,
    pub fetched: Rc<RefCell<Vec<&'static str>>>,
    pub login_count: RefCell<usize>,
}

impl FakePortal {
    pub fn new() -> Self {
        Self {
            login_error: None,
            listings: HashMap::new(),
            fetched: Rc::new(RefCell::new(Vec::new())),
            login_count: RefCell::new(0),
        }
    }

    pub fn failing_login(error: fn() -> AuthError) -> Self {
        let mut portal = Self::new();
        portal.login_error = Some(error);
        portal
    }

    pub fn with_slot(mut self, slot_name: &'static str, outcome: SlotOutcome) -> Self {
        self.listings.insert(slot_name, outcome);
        self
    }
}

impl CoursePortal for FakePortal {
    type Session = FakeSession;

    fn login(&self) -> Result<FakeSession, AuthError> {
        *self.login_count.borrow_mut() += 1;
        if let Some(error) = self.login_error {
            return Err(error());
        }
        Ok(FakeSession {
            listings: self.listings.clone(),
            fetched: Rc::clone(&self.fetched),
        })
    }
}

pub struct FakeSession {
    listings: HashMap<&'static str, SlotOutcome>,
    fetched: Rc<RefCell<Vec<&'static str>>>,
}

impl SlotListings for FakeSession {
    fn slot_listing(&self, slot: &SlotDefinition) -> Result<Option<String>, FetchError> {
        self.fetched.borrow_mut().push(slot.name);
        match self.listings.get(slot.name) {
            Some(SlotOutcome::Markup(markup)) => Ok(Some(markup.clone())),
            Some(SlotOutcome::NetworkError(message)) => Err(FetchError(message.clone())),
            Some(SlotOutcome::Empty) | None => Ok(None),
        }
    }
}

/// Command channel replaying scripted poll batches.
pub struct ScriptedChannel {
    batches: VecDeque<Result<Vec<IncomingMessage>, String>>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self {
            batches: VecDeque::new(),
        }
    }

    pub fn push_batch(&mut self, messages: Vec<IncomingMessage>) {
        self.batches.push_back(Ok(messages));
    }

    pub fn push_error(&mut self, message: &str) {
        self.batches.push_back(Err(message.to_string()));
    }
}

impl CommandChannel for ScriptedChannel {
    fn poll(&mut self, _timeout: Duration) -> Result<Vec<IncomingMessage>, FetchError> {
        match self.batches.pop_front() {
            Some(Ok(messages)) => Ok(messages),
            Some(Err(message)) => Err(FetchError(message)),
            None => Ok(Vec::new()),
        }
    }
}

pub fn message(update_id: i64, chat_id: i64, text: &str) -> IncomingMessage {
    IncomingMessage {
        update_id,
        chat_id,
        text: text.to_string(),
    }
}

/// Listing markup with one `<td>` per (cell text, badge) pair; `None`
/// renders a cell without the vacancy badge.
pub fn listing(cells: &[(&str, Option<&str>)]) -> String {
    let body: String = cells
        .iter()
        .map(|(text, badge)| match badge {
            Some(count) => format!(
                r#"<td>{text} <span class="badge badge-success">{count}</span></td>"#
            ),
            None => format!("<td>{text}</td>"),
        })
        .collect();
    format!("<table><tr>{body}</tr></table>")
}

/// Slot catalog for tests, mirroring the production shape.
pub const TEST_SLOTS: [SlotDefinition; 3] = [
    SlotDefinition { name: "O", portal_id: "15" },
    SlotDefinition { name: "P", portal_id: "16" },
    SlotDefinition { name: "Q", portal_id: "17" },
];
