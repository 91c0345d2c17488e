use crate::backend::ApiError;
use crate::config::Config;
use crate::model::Suggestion;
use serde::Serialize;

/// Issued on every text change; only the newest ticket may fetch or apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Ticket(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Down,
    Up,
    Enter,
    Escape,
}

impl Key {
    /// Maps `KeyboardEvent.key` names.
    pub fn from_name(name: &str) -> Option<Key> {
        match name {
            "ArrowDown" | "Down" => Some(Key::Down),
            "ArrowUp" | "Up" => Some(Key::Up),
            "Enter" => Some(Key::Enter),
            "Escape" | "Esc" => Some(Key::Escape),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Dropdown closed or empty; let the input handle the key.
    Ignored,
    Highlighted(usize),
    /// Enter with nothing highlighted.
    Consumed,
    Closed,
    Committed(String),
}

#[derive(Clone, Debug, Serialize)]
pub struct AutocompleteView<'a> {
    pub text: &'a str,
    pub suggestions: &'a [Suggestion],
    pub open: bool,
    pub highlighted: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct Autocomplete {
    text: String,
    suggestions: Vec<Suggestion>,
    open: bool,
    highlighted: Option<usize>,
    ticket: Ticket,
    min_chars: usize,
    debounce_ms: u32,
}

impl Autocomplete {
    pub fn new(min_chars: usize, debounce_ms: u32) -> Autocomplete {
        Autocomplete {
            text: String::new(),
            suggestions: Vec::new(),
            open: false,
            highlighted: None,
            ticket: Ticket(0),
            min_chars,
            debounce_ms,
        }
    }

    pub fn from_config(config: &Config) -> Autocomplete {
        Autocomplete::new(config.min_query_chars, config.debounce_ms)
    }

    pub fn text(&self) -> &str { &self.text }
    pub fn suggestions(&self) -> &[Suggestion] { &self.suggestions }
    pub fn is_open(&self) -> bool { self.open && !self.suggestions.is_empty() }
    pub fn highlighted(&self) -> Option<usize> { self.highlighted }
    pub fn debounce_ms(&self) -> u32 { self.debounce_ms }

    pub fn view(&self) -> AutocompleteView<'_> {
        AutocompleteView {
            text: &self.text,
            suggestions: &self.suggestions,
            open: self.is_open(),
            highlighted: self.highlighted,
        }
    }

    fn long_enough(&self, text: &str) -> bool {
        text.chars().count() >= self.min_chars
    }

    fn dismiss(&mut self) {
        self.suggestions.clear();
        self.open = false;
        self.highlighted = None;
    }

    /// Records new input text. The caller waits `debounce_ms` and then calls
    /// [`Autocomplete::debounce_elapsed`] with the returned ticket.
    pub fn input(&mut self, text: &str) -> Ticket {
        self.text = text.to_string();
        self.ticket = Ticket(self.ticket.0 + 1);
        if !self.long_enough(text) {
            self.dismiss();
        }
        self.ticket
    }

    /// The query to fetch, if `ticket` is still current and the text is long enough.
    pub fn debounce_elapsed(&self, ticket: Ticket) -> Option<String> {
        if ticket != self.ticket || !self.long_enough(&self.text) {
            return None;
        }
        Some(self.text.clone())
    }

    /// Applies a fetch result. Returns false for stale tickets.
    pub fn receive(&mut self, ticket: Ticket, result: Result<Vec<Suggestion>, ApiError>) -> bool {
        if ticket != self.ticket || !self.long_enough(&self.text) {
            return false;
        }
        match result {
            Ok(list) if !list.is_empty() => {
                self.suggestions = list;
                self.open = true;
                self.highlighted = None;
            }
            Ok(_) => self.dismiss(),
            Err(e) => {
                log::warn!("address suggestions unavailable: {e}");
                self.dismiss();
            }
        }
        true
    }

    pub fn key(&mut self, key: Key) -> KeyOutcome {
        if !self.is_open() {
            return KeyOutcome::Ignored;
        }
        let n = self.suggestions.len();
        match key {
            Key::Down => {
                let i = match self.highlighted {
                    Some(i) if i + 1 < n => i + 1,
                    _ => 0,
                };
                self.highlighted = Some(i);
                KeyOutcome::Highlighted(i)
            }
            Key::Up => {
                let i = match self.highlighted {
                    Some(i) if i > 0 && i <= n => i - 1,
                    _ => n - 1,
                };
                self.highlighted = Some(i);
                KeyOutcome::Highlighted(i)
            }
            Key::Enter => match self.highlighted.and_then(|i| self.select(i)) {
                Some(address) => KeyOutcome::Committed(address),
                None => KeyOutcome::Consumed,
            },
            Key::Escape => {
                self.open = false;
                KeyOutcome::Closed
            }
        }
    }

    pub fn hover(&mut self, index: usize) {
        if index < self.suggestions.len() {
            self.highlighted = Some(index);
        }
    }

    /// Commits suggestion `index`: replaces the text, closes the dropdown and
    /// returns the committed address.
    pub fn select(&mut self, index: usize) -> Option<String> {
        let address = self.suggestions.get(index)?.description.clone();
        self.text = address.clone();
        // Responses for the previous text must not reopen the list
        self.ticket = Ticket(self.ticket.0 + 1);
        self.dismiss();
        Some(address)
    }

    pub fn click_outside(&mut self) {
        self.open = false;
    }

    pub fn focus(&mut self) {
        if !self.suggestions.is_empty() {
            self.open = true;
        }
    }
}
