// Countries view state.
// One bulk load, then search, region filter, sort, and paging in memory.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

use crate::api::Country;
use crate::tasks::{LoadOutcome, LoadRequest};

use super::input::SearchBox;
use super::list::{LoadingState, Selection};
use super::page::{Effect, PageContext};
use super::query::{Pagination, SortOrder, filter_indices, matches_term, sort_indices_by};
use super::request::{RequestSlot, Ticket};

pub const COUNTRIES_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountrySort {
    #[default]
    NameAsc,
    NameDesc,
    PopulationDesc,
    PopulationAsc,
}

impl CountrySort {
    pub fn next(&self) -> Self {
        match self {
            CountrySort::NameAsc => CountrySort::NameDesc,
            CountrySort::NameDesc => CountrySort::PopulationDesc,
            CountrySort::PopulationDesc => CountrySort::PopulationAsc,
            CountrySort::PopulationAsc => CountrySort::NameAsc,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CountrySort::NameAsc => "name ↑",
            CountrySort::NameDesc => "name ↓",
            CountrySort::PopulationDesc => "population ↓",
            CountrySort::PopulationAsc => "population ↑",
        }
    }
}

#[derive(Debug)]
pub struct CountriesPage {
    pub countries: LoadingState<Vec<Country>>,
    pub search: SearchBox,
    pub region: Option<String>,
    pub sort: CountrySort,
    pub pagination: Pagination,
    /// Indices into the loaded countries after filtering and sorting, across all pages.
    pub visible: Vec<usize>,
    /// Cursor within the current page.
    pub selection: Selection,
    pub detail: Option<Country>,
    slot: RequestSlot,
}

impl CountriesPage {
    pub fn new(debounce: Duration) -> Self {
        Self {
            countries: LoadingState::Idle,
            search: SearchBox::new(debounce),
            region: None,
            sort: CountrySort::default(),
            pagination: Pagination::new(COUNTRIES_PAGE_SIZE),
            visible: Vec::new(),
            selection: Selection::default(),
            detail: None,
            slot: RequestSlot::default(),
        }
    }

    pub fn on_enter(&mut self, ctx: &mut PageContext) -> Vec<Effect> {
        vec![self.load(ctx)]
    }

    pub fn captures_input(&self) -> bool {
        self.search.editing || self.detail.is_some()
    }

    fn load(&mut self, ctx: &mut PageContext) -> Effect {
        self.countries = LoadingState::Loading;
        Effect::Load(self.slot.begin(ctx.ids), LoadRequest::Countries)
    }

    /// Distinct non-empty regions of the loaded countries, sorted.
    pub fn regions(&self) -> Vec<String> {
        let mut regions: Vec<String> = self
            .countries
            .data()
            .map(|countries| {
                countries
                    .iter()
                    .map(|c| c.region.clone())
                    .filter(|r| !r.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        regions.sort();
        regions.dedup();
        regions
    }

    /// Countries on the current page, in display order.
    pub fn page_countries(&self) -> Vec<&Country> {
        let Some(countries) = self.countries.data() else {
            return Vec::new();
        };
        self.visible[self.pagination.range(self.visible.len())]
            .iter()
            .filter_map(|i| countries.get(*i))
            .collect()
    }

    pub fn selected_country(&self) -> Option<&Country> {
        self.page_countries().get(self.selection.selected()?).copied()
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.visible.len())
    }

    fn cycle_region(&mut self) {
        let regions = self.regions();
        self.region = match &self.region {
            None => regions.first().cloned(),
            Some(current) => regions
                .iter()
                .position(|r| r == current)
                .and_then(|i| regions.get(i + 1))
                .cloned(),
        };
        self.rederive();
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut PageContext) -> Vec<Effect> {
        if self.detail.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.detail = None;
            }
            return Vec::new();
        }
        if self.search.editing {
            self.search.handle_key(&key, ctx.now);
            return Vec::new();
        }

        let page_len = self.page_countries().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selection.select_prev(page_len),
            KeyCode::Down | KeyCode::Char('j') => self.selection.select_next(page_len),
            KeyCode::Left | KeyCode::Char('h') => {
                if self.pagination.prev() {
                    self.selection.reset(self.page_countries().len());
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.pagination.next(self.visible.len()) {
                    self.selection.reset(self.page_countries().len());
                }
            }
            KeyCode::Char('/') => self.search.begin_editing(),
            KeyCode::Char('f') => self.cycle_region(),
            KeyCode::Char('s') => {
                self.sort = self.sort.next();
                self.rederive();
            }
            KeyCode::Char('r') => return vec![self.load(ctx)],
            KeyCode::Enter => self.detail = self.selected_country().cloned(),
            _ => {}
        }
        Vec::new()
    }

    pub fn tick(&mut self, ctx: &mut PageContext) -> Vec<Effect> {
        if let Some(term) = self.search.poll(ctx.now) {
            debug!(term, "filtering countries");
            self.rederive();
        }
        Vec::new()
    }

    pub fn apply(&mut self, ticket: Ticket, outcome: LoadOutcome) -> Vec<Effect> {
        match outcome {
            LoadOutcome::Countries(result) if self.slot.settle(ticket) => match result {
                Ok(countries) => {
                    self.countries = LoadingState::Loaded(countries);
                    self.rederive();
                    Vec::new()
                }
                Err(e) => {
                    let message = e.to_string();
                    self.countries = LoadingState::Error(message.clone());
                    self.rederive();
                    vec![Effect::error(message)]
                }
            },
            _ => {
                debug!(generation = ticket.generation, "discarding stale countries outcome");
                Vec::new()
            }
        }
    }

    /// Recompute visible rows; any change to the result set returns to the first page.
    fn rederive(&mut self) {
        self.pagination.reset();
        let Some(countries) = self.countries.data() else {
            self.visible.clear();
            self.selection.reset(0);
            return;
        };

        let term = self.search.term();
        let region = self.region.as_deref();
        let mut visible = filter_indices(countries, |c| {
            let in_region = region.is_none_or(|r| c.region == r);
            let matches = matches_term(&c.name.common, term)
                || matches_term(&c.name.official, term)
                || c.capital().is_some_and(|capital| matches_term(capital, term));
            in_region && matches
        });
        match self.sort {
            CountrySort::NameAsc => {
                sort_indices_by(&mut visible, countries, |c| c.name.common.to_lowercase(), SortOrder::Ascending)
            }
            CountrySort::NameDesc => {
                sort_indices_by(&mut visible, countries, |c| c.name.common.to_lowercase(), SortOrder::Descending)
            }
            CountrySort::PopulationDesc => {
                sort_indices_by(&mut visible, countries, |c| c.population, SortOrder::Descending)
            }
            CountrySort::PopulationAsc => {
                sort_indices_by(&mut visible, countries, |c| c.population, SortOrder::Ascending)
            }
        }
        self.visible = visible;
        let page_len = self.page_countries().len();
        self.selection.reset(page_len);
    }
}
