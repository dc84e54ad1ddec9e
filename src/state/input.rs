// Single-line text entry.
// Used by search boxes, prompts, and the post form.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::debounce::Debouncer;

/// What a key did to an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    Changed,
    Submitted,
    Cancelled,
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
}

impl TextInput {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Enter => InputResult::Submitted,
            KeyCode::Esc => InputResult::Cancelled,
            KeyCode::Backspace => {
                if self.value.pop().is_some() {
                    InputResult::Changed
                } else {
                    InputResult::Ignored
                }
            }
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                self.value.push(c);
                InputResult::Changed
            }
            _ => InputResult::Ignored,
        }
    }
}

/// A search field whose committed term trails typing by the debounce delay.
#[derive(Debug)]
pub struct SearchBox {
    pub input: TextInput,
    pub editing: bool,
    term: String,
    debouncer: Debouncer<String>,
}

impl SearchBox {
    pub fn new(delay: Duration) -> Self {
        Self {
            input: TextInput::default(),
            editing: false,
            term: String::new(),
            debouncer: Debouncer::new(delay),
        }
    }

    /// The term currently applied to results.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Typed text that has not been applied yet.
    pub fn is_settling(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn begin_editing(&mut self) {
        self.editing = true;
    }

    /// Feed a key while editing. Enter and Esc leave edit mode; the pending term
    /// still lands when the delay elapses.
    pub fn handle_key(&mut self, key: &KeyEvent, now: Instant) {
        match self.input.handle_key(key) {
            InputResult::Changed => self.debouncer.push(self.input.value().trim().to_string(), now),
            InputResult::Submitted | InputResult::Cancelled => self.editing = false,
            InputResult::Ignored => {}
        }
    }

    /// Returns the new term when a debounced change lands and differs from the applied one.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let term = self.debouncer.poll(now)?;
        if term == self.term {
            return None;
        }
        self.term = term.clone();
        Some(term)
    }

    /// Reset to an empty term immediately.
    pub fn clear(&mut self) {
        self.input.clear();
        self.debouncer.cancel();
        self.term.clear();
        self.editing = false;
    }
}
