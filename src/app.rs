// App state and main event loop.
// Routes keys to the active view, runs the loads it asks for, and delivers their outcomes.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::router::{Route, Router};
use crate::services::Services;
use crate::state::{
    Effect, InputResult, Page, PageContext, PageSettings, RequestIds, TextInput, ToastKind, Toasts,
};
use crate::tasks::{self, Loaded};
use crate::ui;

/// How long the loop waits for input before ticking.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Main application state.
pub struct App {
    pub router: Router,
    /// State of the view for the current route.
    pub page: Page,
    pub toasts: Toasts,
    /// Open `:` route prompt.
    pub route_prompt: Option<TextInput>,
    pub show_help: bool,
    /// Whether the app should exit.
    pub should_quit: bool,
    ids: RequestIds,
    settings: PageSettings,
    services: Arc<Services>,
    loads_tx: UnboundedSender<Loaded>,
    loads_rx: UnboundedReceiver<Loaded>,
}

impl App {
    /// Build the app on the default route. Call [`App::navigate`] to start loading.
    pub fn new(services: Arc<Services>, settings: PageSettings, toast_lifetime: Duration) -> Self {
        let (loads_tx, loads_rx) = mpsc::unbounded_channel();
        Self {
            router: Router::new(),
            page: Page::new(Route::default(), &settings),
            toasts: Toasts::new(toast_lifetime),
            route_prompt: None,
            show_help: false,
            should_quit: false,
            ids: RequestIds::default(),
            settings,
            services,
            loads_tx,
            loads_rx,
        }
    }

    /// Resolve a location and enter its view with fresh state.
    pub fn navigate(&mut self, fragment: &str) {
        let navigation = self.router.navigate(fragment);
        if navigation.redirected {
            info!(fragment, route = navigation.route.fragment(), "unknown route, redirecting");
            self.toasts.push(
                ToastKind::Warning,
                format!("Unknown route {}, showing {}", fragment.trim(), navigation.route.fragment()),
                Instant::now(),
            );
        }
        self.enter(navigation.route);
    }

    fn enter(&mut self, route: Route) {
        info!(route = route.fragment(), "entering view");
        self.page = Page::new(route, &self.settings);
        let mut ctx = PageContext {
            ids: &mut self.ids,
            now: Instant::now(),
        };
        let effects = self.page.on_enter(&mut ctx);
        self.run_effects(effects);
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
            self.drain_loads();
            self.tick(Instant::now());
        }
        Ok(())
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if let Some(prompt) = &mut self.route_prompt {
            match prompt.handle_key(&key) {
                InputResult::Submitted => {
                    let fragment = prompt.value().to_string();
                    self.route_prompt = None;
                    self.navigate(&fragment);
                }
                InputResult::Cancelled => self.route_prompt = None,
                _ => {}
            }
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        if !self.page.captures_input() {
            let current = self.router.current();
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                    return;
                }
                KeyCode::Char(':') => {
                    self.route_prompt = Some(TextInput::with_value("#"));
                    return;
                }
                KeyCode::Tab => {
                    self.navigate(current.next().fragment());
                    return;
                }
                KeyCode::BackTab => {
                    self.navigate(current.prev().fragment());
                    return;
                }
                KeyCode::Char(c @ '1'..='4') => {
                    let index = c as usize - '1' as usize;
                    self.navigate(Route::ALL[index].fragment());
                    return;
                }
                _ => {}
            }
        }

        let mut ctx = PageContext {
            ids: &mut self.ids,
            now: Instant::now(),
        };
        let effects = self.page.handle_key(key, &mut ctx);
        self.run_effects(effects);
    }

    /// Deliver finished loads to the active view.
    pub fn drain_loads(&mut self) {
        while let Ok(Loaded { ticket, outcome }) = self.loads_rx.try_recv() {
            debug!(generation = ticket.generation, "load finished");
            let effects = self.page.apply(ticket, outcome);
            self.run_effects(effects);
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.toasts.prune(now);
        let mut ctx = PageContext {
            ids: &mut self.ids,
            now,
        };
        let effects = self.page.tick(&mut ctx);
        self.run_effects(effects);
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Load(ticket, request) => {
                    tasks::spawn(self.services.clone(), ticket, request, self.loads_tx.clone());
                }
                Effect::Notify(kind, message) => self.toasts.push(kind, message, Instant::now()),
            }
        }
    }
}
