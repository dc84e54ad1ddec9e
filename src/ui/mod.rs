// UI module for rendering the TUI.
// Navigation bar, the active view, status hints, toasts, and overlays.

mod characters;
mod countries;
mod modal;
mod navbar;
mod posts;
mod toast;
mod weather;
mod widgets;

use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::state::Page;

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Navigation bar
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    navbar::draw_navbar(frame, app.router.current(), chunks[0]);

    match &mut app.page {
        Page::Posts(page) => posts::draw_posts(frame, page, chunks[1]),
        Page::Characters(page) => characters::draw_characters(frame, page, chunks[1]),
        Page::Countries(page) => countries::draw_countries(frame, page, chunks[1]),
        Page::Weather(page) => weather::draw_weather(frame, page, chunks[1]),
    }

    draw_status_bar(frame, app, chunks[2]);
    toast::draw_toasts(frame, &app.toasts, chunks[1]);

    if let Some(prompt) = &app.route_prompt {
        modal::draw_prompt(frame, "Go to", "Route", prompt);
    }

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Key hints for the active view.
fn page_hints(page: &Page) -> Vec<(&'static str, &'static str)> {
    match page {
        Page::Posts(p) if p.form.is_some() => vec![("Tab", "Field"), ("↵", "Submit"), ("Esc", "Cancel")],
        Page::Posts(p) if p.detail.is_some() => vec![("↑↓", "Scroll"), ("Esc", "Close")],
        Page::Posts(_) => vec![
            ("↑↓", "Navigate"),
            ("↵", "Open"),
            ("/", "Search"),
            ("s", "Sort"),
            ("n", "New"),
            ("e", "Edit"),
            ("d", "Delete"),
        ],
        Page::Characters(_) => vec![
            ("↑↓", "Navigate"),
            ("←→", "Page"),
            ("/", "Name"),
            ("s", "Status"),
            ("g", "Gender"),
            ("p", "Species"),
            ("o", "Order"),
            ("c", "Clear"),
        ],
        Page::Countries(_) => vec![
            ("↑↓", "Navigate"),
            ("←→", "Page"),
            ("/", "Search"),
            ("f", "Region"),
            ("s", "Sort"),
        ],
        Page::Weather(p) if p.editing => vec![("↵", "Search"), ("Esc", "Cancel")],
        Page::Weather(_) => vec![
            ("/", "Location"),
            ("i", "My location"),
            ("u", "Units"),
            ("R", "Refresh"),
            ("↑↓↵", "Recent"),
            ("x", "Clear recent"),
        ],
    }
}

/// Draw the status bar at the bottom.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {} ", app.router.current().fragment()),
        Style::default().fg(Color::Yellow),
    )];
    if app.page.is_loading() {
        spans.push(Span::styled("⏳ ", Style::default().fg(Color::Yellow)));
    }
    spans.extend(
        page_hints(&app.page)
            .into_iter()
            .flat_map(|(key, action)| widgets::hint(key, action)),
    );

    if !app.page.captures_input() {
        for (key, action) in [("r", "Retry"), (":", "Go to"), ("?", "Help"), ("q", "Quit")] {
            spans.extend(widgets::hint(key, action));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the help overlay popup.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    let popup_area = widgets::centered_rect(area, 56, 22);
    frame.render_widget(Clear, popup_area);

    let key = |k: &'static str, action: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<14}", k), Style::default().fg(Color::Cyan)),
            Span::raw(action),
        ])
    };

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        key("1-4 / Tab", "Switch view"),
        key(":", "Go to a route (#posts, #weather, ...)"),
        key("↑/↓ or j/k", "Navigate list"),
        key("←/→ or h/l", "Previous / next page"),
        key("Enter", "Open details"),
        key("Esc", "Close dialog / stop editing"),
        key("/", "Search or edit query"),
        key("s / o", "Change sort"),
        key("f / g / p", "Region / gender / species filter"),
        key("n / e / d", "New / edit / delete post"),
        key("i", "Weather for your location"),
        key("u", "Toggle weather units"),
        key("R", "Refresh weather, skipping cache"),
        key("r", "Retry / reload"),
        key("?", "Show/hide this help"),
        key("q / Ctrl-c", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or ? to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Help "),
    );
    frame.render_widget(help, popup_area);
}
