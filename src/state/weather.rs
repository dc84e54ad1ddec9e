// Weather view state.
// Query prompt, unit toggle, and persisted search history around the weather service.

use crossterm::event::{KeyCode, KeyEvent};
use tracing::{debug, warn};

use crate::api::Units;
use crate::config::ACCESS_KEY_ENV;
use crate::services::{LocationQuery, WeatherQuery, WeatherReport};
use crate::storage::{CALLER_IP_QUERY, Preferences, SearchHistory};
use crate::tasks::{LoadOutcome, LoadRequest};

use super::input::{InputResult, TextInput};
use super::list::{LoadingState, Selection};
use super::page::{Effect, PageContext};
use super::request::{RequestSlot, Ticket};
use super::toast::ToastKind;

pub struct WeatherPage {
    pub input: TextInput,
    pub editing: bool,
    pub units: Units,
    pub report: LoadingState<WeatherReport>,
    pub history: SearchHistory,
    pub history_selection: Selection,
    /// Last query submitted, for retry, refresh, and unit changes.
    pub last_query: Option<WeatherQuery>,
    /// Whether an access key is configured.
    pub configured: bool,
    prefs: Preferences,
    slot: RequestSlot,
}

impl std::fmt::Debug for WeatherPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherPage")
            .field("input", &self.input)
            .field("units", &self.units)
            .field("report", &self.report)
            .field("last_query", &self.last_query)
            .field("configured", &self.configured)
            .finish_non_exhaustive()
    }
}

fn missing_key_notice() -> Effect {
    Effect::notify(
        ToastKind::Warning,
        format!("Weather API key missing; set {}", ACCESS_KEY_ENV),
    )
}

impl WeatherPage {
    pub fn new(prefs: Preferences, configured: bool) -> Self {
        let history = prefs.history();
        let mut history_selection = Selection::default();
        history_selection.reset(history.len());
        Self {
            input: TextInput::default(),
            editing: false,
            units: prefs.units(),
            report: LoadingState::Idle,
            history,
            history_selection,
            last_query: None,
            configured,
            prefs,
            slot: RequestSlot::default(),
        }
    }

    pub fn on_enter(&mut self, _ctx: &mut PageContext) -> Vec<Effect> {
        if self.configured {
            self.editing = true;
            Vec::new()
        } else {
            vec![missing_key_notice()]
        }
    }

    pub fn captures_input(&self) -> bool {
        self.editing
    }

    /// Validate and issue a lookup. Invalid input never reaches the network.
    fn submit(&mut self, query: WeatherQuery, ctx: &mut PageContext) -> Vec<Effect> {
        if !self.configured {
            return vec![missing_key_notice()];
        }
        if let Err(e) = LocationQuery::parse(&query.query) {
            let message = e.to_string();
            self.slot.cancel();
            self.report = LoadingState::Error(message.clone());
            return vec![Effect::notify(ToastKind::Warning, message)];
        }

        self.report = LoadingState::Loading;
        self.last_query = Some(query.clone());
        let ticket = self.slot.begin(ctx.ids);
        vec![Effect::Load(ticket, LoadRequest::Weather(query))]
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut PageContext) -> Vec<Effect> {
        if self.editing {
            match self.input.handle_key(&key) {
                InputResult::Submitted => {
                    self.editing = false;
                    let query = WeatherQuery::new(self.input.value().trim(), self.units);
                    return self.submit(query, ctx);
                }
                InputResult::Cancelled => self.editing = false,
                _ => {}
            }
            return Vec::new();
        }

        let len = self.history.len();
        match key.code {
            KeyCode::Char('/') | KeyCode::Char('e') => self.editing = true,
            KeyCode::Up | KeyCode::Char('k') => self.history_selection.select_prev(len),
            KeyCode::Down | KeyCode::Char('j') => self.history_selection.select_next(len),
            KeyCode::Enter => {
                let entry = self
                    .history_selection
                    .selected()
                    .and_then(|i| self.history.get(i))
                    .map(str::to_string);
                match entry {
                    Some(entry) => {
                        self.input = TextInput::with_value(entry.clone());
                        return self.submit(WeatherQuery::new(entry, self.units), ctx);
                    }
                    None => self.editing = true,
                }
            }
            KeyCode::Char('i') => {
                self.input = TextInput::with_value(CALLER_IP_QUERY);
                return self.submit(WeatherQuery::new(CALLER_IP_QUERY, self.units), ctx);
            }
            KeyCode::Char('u') => {
                self.units = self.units.next();
                if let Err(e) = self.prefs.set_units(self.units) {
                    warn!(error = %e, "failed to persist unit preference");
                }
                let mut effects = vec![Effect::notify(
                    ToastKind::Info,
                    format!("Units: {}", self.units.label()),
                )];
                if let Some(last) = self.last_query.clone() {
                    effects.extend(self.submit(WeatherQuery::new(last.query, self.units), ctx));
                }
                return effects;
            }
            KeyCode::Char('R') => {
                if let Some(last) = self.last_query.clone() {
                    return self.submit(WeatherQuery::new(last.query, self.units).bypassing_cache(), ctx);
                }
            }
            KeyCode::Char('r') => {
                if let Some(last) = self.last_query.clone() {
                    return self.submit(last, ctx);
                }
            }
            KeyCode::Char('x') => {
                self.history.clear();
                self.history_selection.reset(0);
                if let Err(e) = self.prefs.save_history(&self.history) {
                    warn!(error = %e, "failed to persist search history");
                }
            }
            _ => {}
        }
        Vec::new()
    }

    pub fn apply(&mut self, ticket: Ticket, outcome: LoadOutcome) -> Vec<Effect> {
        match outcome {
            LoadOutcome::Weather(result) if self.slot.settle(ticket) => match result {
                Ok(report) => {
                    self.history.push(&report.query);
                    self.history_selection.reset(self.history.len());
                    if let Err(e) = self.prefs.save_history(&self.history) {
                        warn!(error = %e, "failed to persist search history");
                    }
                    let message = if report.from_cache {
                        format!("{} (cached)", report.data.location.name)
                    } else {
                        format!("Updated {}", report.data.location.name)
                    };
                    self.report = LoadingState::Loaded(report);
                    vec![Effect::notify(ToastKind::Success, message)]
                }
                Err(e) => {
                    let message = e.to_string();
                    self.report = LoadingState::Error(message.clone());
                    vec![Effect::error(message)]
                }
            },
            _ => {
                debug!(generation = ticket.generation, "discarding stale weather outcome");
                Vec::new()
            }
        }
    }
}
