// Active view dispatch.
// One enum over the four views; the app only talks to views through it.

use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;

use crate::router::Route;
use crate::storage::Preferences;
use crate::tasks::{LoadOutcome, LoadRequest};

use super::characters::CharactersPage;
use super::countries::CountriesPage;
use super::posts::PostsPage;
use super::request::{RequestIds, Ticket};
use super::toast::ToastKind;
use super::weather::WeatherPage;

/// Side effects a view asks the app to perform.
#[derive(Debug)]
pub enum Effect {
    Load(Ticket, LoadRequest),
    Notify(ToastKind, String),
}

impl Effect {
    pub fn notify(kind: ToastKind, message: impl Into<String>) -> Self {
        Effect::Notify(kind, message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Effect::Notify(ToastKind::Error, message.into())
    }
}

/// Per-call context handed to views.
pub struct PageContext<'a> {
    pub ids: &'a mut RequestIds,
    pub now: Instant,
}

/// Settings a view needs when it is built.
#[derive(Clone)]
pub struct PageSettings {
    pub debounce: Duration,
    pub prefs: Preferences,
    pub weather_configured: bool,
}

#[derive(Debug)]
pub enum Page {
    Posts(PostsPage),
    Characters(CharactersPage),
    Countries(CountriesPage),
    Weather(WeatherPage),
}

impl Page {
    /// Fresh state for a route. Nothing is loaded until [`Page::on_enter`].
    pub fn new(route: Route, settings: &PageSettings) -> Self {
        match route {
            Route::Posts => Page::Posts(PostsPage::new(settings.debounce)),
            Route::Characters => Page::Characters(CharactersPage::new(settings.debounce)),
            Route::Countries => Page::Countries(CountriesPage::new(settings.debounce)),
            Route::Weather => Page::Weather(WeatherPage::new(
                settings.prefs.clone(),
                settings.weather_configured,
            )),
        }
    }

    /// Whether the view's main data is being fetched.
    pub fn is_loading(&self) -> bool {
        match self {
            Page::Posts(page) => page.posts.is_loading(),
            Page::Characters(page) => page.data.is_loading(),
            Page::Countries(page) => page.countries.is_loading(),
            Page::Weather(page) => page.report.is_loading(),
        }
    }

    pub fn on_enter(&mut self, ctx: &mut PageContext) -> Vec<Effect> {
        match self {
            Page::Posts(page) => page.on_enter(ctx),
            Page::Characters(page) => page.on_enter(ctx),
            Page::Countries(page) => page.on_enter(ctx),
            Page::Weather(page) => page.on_enter(ctx),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut PageContext) -> Vec<Effect> {
        match self {
            Page::Posts(page) => page.handle_key(key, ctx),
            Page::Characters(page) => page.handle_key(key, ctx),
            Page::Countries(page) => page.handle_key(key, ctx),
            Page::Weather(page) => page.handle_key(key, ctx),
        }
    }

    /// Time-driven work such as debounced searches.
    pub fn tick(&mut self, ctx: &mut PageContext) -> Vec<Effect> {
        match self {
            Page::Posts(page) => page.tick(ctx),
            Page::Characters(page) => page.tick(ctx),
            Page::Countries(page) => page.tick(ctx),
            Page::Weather(_) => Vec::new(),
        }
    }

    /// Deliver a finished load. Outcomes this view did not ask for are dropped.
    pub fn apply(&mut self, ticket: Ticket, outcome: LoadOutcome) -> Vec<Effect> {
        match self {
            Page::Posts(page) => page.apply(ticket, outcome),
            Page::Characters(page) => page.apply(ticket, outcome),
            Page::Countries(page) => page.apply(ticket, outcome),
            Page::Weather(page) => page.apply(ticket, outcome),
        }
    }

    /// Whether the view wants every key, including the global shortcuts.
    pub fn captures_input(&self) -> bool {
        match self {
            Page::Posts(page) => page.captures_input(),
            Page::Characters(page) => page.captures_input(),
            Page::Countries(page) => page.captures_input(),
            Page::Weather(page) => page.captures_input(),
        }
    }
}
