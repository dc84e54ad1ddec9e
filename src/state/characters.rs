// Characters view state.
// Server-side filters and paging, client-side name ordering within a page.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

use crate::api::{Character, CharacterPage};
use crate::services::{CharacterGender, CharacterQuery, CharacterStatus};
use crate::tasks::{LoadOutcome, LoadRequest};

use super::input::{InputResult, SearchBox, TextInput};
use super::list::{LoadingState, Selection};
use super::page::{Effect, PageContext};
use super::query::{SortOrder, sort_indices_by};
use super::request::{RequestSlot, Ticket};

#[derive(Debug)]
pub struct CharactersPage {
    pub query: CharacterQuery,
    pub data: LoadingState<CharacterPage>,
    /// Indices into the current page's results in display order.
    pub visible: Vec<usize>,
    pub selection: Selection,
    pub name_search: SearchBox,
    /// Open species prompt, if any.
    pub species_input: Option<TextInput>,
    /// Name ordering within the page; `None` keeps server order.
    pub sort: Option<SortOrder>,
    pub detail: Option<Character>,
    slot: RequestSlot,
}

impl CharactersPage {
    pub fn new(debounce: Duration) -> Self {
        Self {
            query: CharacterQuery::default(),
            data: LoadingState::Idle,
            visible: Vec::new(),
            selection: Selection::default(),
            name_search: SearchBox::new(debounce),
            species_input: None,
            sort: None,
            detail: None,
            slot: RequestSlot::default(),
        }
    }

    pub fn on_enter(&mut self, ctx: &mut PageContext) -> Vec<Effect> {
        vec![self.load(ctx)]
    }

    pub fn captures_input(&self) -> bool {
        self.name_search.editing || self.species_input.is_some() || self.detail.is_some()
    }

    pub fn selected_character(&self) -> Option<&Character> {
        let index = *self.visible.get(self.selection.selected()?)?;
        self.data.data()?.results.get(index)
    }

    pub fn visible_characters(&self) -> Vec<&Character> {
        match self.data.data() {
            Some(page) => self.visible.iter().filter_map(|i| page.results.get(*i)).collect(),
            None => Vec::new(),
        }
    }

    fn load(&mut self, ctx: &mut PageContext) -> Effect {
        self.data = LoadingState::Loading;
        Effect::Load(self.slot.begin(ctx.ids), LoadRequest::Characters(self.query.clone()))
    }

    /// Apply a filter change: back to the first page and reload.
    fn refilter(&mut self, ctx: &mut PageContext) -> Vec<Effect> {
        self.query.page = 1;
        vec![self.load(ctx)]
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut PageContext) -> Vec<Effect> {
        if self.detail.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.detail = None;
            }
            return Vec::new();
        }
        if let Some(input) = &mut self.species_input {
            match input.handle_key(&key) {
                InputResult::Submitted => {
                    let species = input.value().trim().to_string();
                    self.species_input = None;
                    self.query.species = (!species.is_empty()).then_some(species);
                    return self.refilter(ctx);
                }
                InputResult::Cancelled => self.species_input = None,
                _ => {}
            }
            return Vec::new();
        }
        if self.name_search.editing {
            self.name_search.handle_key(&key, ctx.now);
            return Vec::new();
        }

        let len = self.visible.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selection.select_prev(len),
            KeyCode::Down | KeyCode::Char('j') => self.selection.select_next(len),
            KeyCode::Left | KeyCode::Char('h') => {
                if self.data.data().is_some_and(CharacterPage::has_prev) {
                    self.query.page = self.query.page.saturating_sub(1).max(1);
                    return vec![self.load(ctx)];
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.data.data().is_some_and(CharacterPage::has_next) {
                    self.query.page += 1;
                    return vec![self.load(ctx)];
                }
            }
            KeyCode::Char('/') => self.name_search.begin_editing(),
            KeyCode::Char('p') => {
                self.species_input = Some(TextInput::with_value(self.query.species.clone().unwrap_or_default()));
            }
            KeyCode::Char('s') => {
                self.query.status = CharacterStatus::cycle(self.query.status);
                return self.refilter(ctx);
            }
            KeyCode::Char('g') => {
                self.query.gender = CharacterGender::cycle(self.query.gender);
                return self.refilter(ctx);
            }
            KeyCode::Char('o') => {
                self.sort = match self.sort {
                    None => Some(SortOrder::Ascending),
                    Some(SortOrder::Ascending) => Some(SortOrder::Descending),
                    Some(SortOrder::Descending) => None,
                };
                self.rederive();
            }
            KeyCode::Char('c') => {
                if self.query.is_filtered() || !self.name_search.term().is_empty() {
                    self.query = CharacterQuery::default();
                    self.name_search.clear();
                    return vec![self.load(ctx)];
                }
            }
            KeyCode::Char('r') => return vec![self.load(ctx)],
            KeyCode::Enter => self.detail = self.selected_character().cloned(),
            _ => {}
        }
        Vec::new()
    }

    pub fn tick(&mut self, ctx: &mut PageContext) -> Vec<Effect> {
        match self.name_search.poll(ctx.now) {
            Some(term) => {
                debug!(term, "searching characters");
                self.query.name = (!term.is_empty()).then_some(term);
                self.refilter(ctx)
            }
            None => Vec::new(),
        }
    }

    pub fn apply(&mut self, ticket: Ticket, outcome: LoadOutcome) -> Vec<Effect> {
        match outcome {
            LoadOutcome::Characters(result) if self.slot.settle(ticket) => match result {
                Ok(page) => {
                    self.data = LoadingState::Loaded(page);
                    self.rederive();
                    Vec::new()
                }
                Err(e) => {
                    let message = e.to_string();
                    self.data = LoadingState::Error(message.clone());
                    self.rederive();
                    vec![Effect::error(message)]
                }
            },
            _ => {
                debug!(generation = ticket.generation, "discarding stale characters outcome");
                Vec::new()
            }
        }
    }

    fn rederive(&mut self) {
        let Some(page) = self.data.data() else {
            self.visible.clear();
            self.selection.reset(0);
            return;
        };
        let mut visible: Vec<usize> = (0..page.results.len()).collect();
        if let Some(order) = self.sort {
            sort_indices_by(&mut visible, &page.results, |c| c.name.to_lowercase(), order);
        }
        self.visible = visible;
        self.selection.reset(self.visible.len());
    }
}
