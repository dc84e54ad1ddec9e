// Weather view rendering.
// Query field, current conditions, and the recent-search list.

use ratatui::{prelude::*, widgets::*};

use crate::config::ACCESS_KEY_ENV;
use crate::services::WeatherReport;
use crate::state::{LoadingState, WeatherPage};

use super::modal::field_line;
use super::widgets::{highlight_style, render_empty, render_error, render_loading};

pub fn draw_weather(frame: &mut Frame, page: &mut WeatherPage, area: Rect) {
    let banner_height = if page.configured { 0 } else { 2 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(banner_height), // Missing key banner
            Constraint::Length(3),             // Query
            Constraint::Min(1),                // Report and history
        ])
        .split(area);

    if !page.configured {
        let banner = Paragraph::new(vec![
            Line::from(Span::styled(
                "⚠ Weather API key missing",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("Set {} or weather.access_key in config.toml", ACCESS_KEY_ENV),
                Style::default().fg(Color::DarkGray),
            )),
        ]);
        frame.render_widget(banner, chunks[0]);
    }

    let border = if page.editing { Color::Yellow } else { Color::DarkGray };
    let mut spans = vec![Span::raw(page.input.value())];
    if page.editing {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    } else if page.input.is_empty() {
        spans.push(Span::styled(
            "city, \"lat,lon\", or press i for your location",
            Style::default().fg(Color::DarkGray),
        ));
    }
    let query = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Location ")
            .title(Line::from(format!(" units: {} ", page.units.label())).right_aligned()),
    );
    frame.render_widget(query, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(32)])
        .split(chunks[2]);

    let block = Block::default().borders(Borders::ALL).title(" Current Conditions ");
    let inner = block.inner(body[0]);
    frame.render_widget(block, body[0]);

    match &page.report {
        LoadingState::Idle => render_empty(frame, inner, "Search for a location to see the weather"),
        LoadingState::Loading => render_loading(frame, inner, "Fetching weather"),
        LoadingState::Error(e) => render_error(frame, inner, e),
        LoadingState::Loaded(report) => draw_report(frame, report, inner),
    }

    let history_block = Block::default().borders(Borders::ALL).title(" Recent ");
    if page.history.is_empty() {
        let empty = Paragraph::new("No recent searches")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(history_block);
        frame.render_widget(empty, body[1]);
    } else {
        let items: Vec<ListItem> = page
            .history
            .entries()
            .iter()
            .map(|entry| ListItem::new(entry.as_str()))
            .collect();
        let list = List::new(items)
            .block(history_block)
            .highlight_style(highlight_style())
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, body[1], &mut page.history_selection.list_state);
    }
}

fn draw_report(frame: &mut Frame, report: &WeatherReport, area: Rect) {
    let location = &report.data.location;
    let current = &report.data.current;
    let units = report.units;

    let place = [location.name.as_str(), location.region.as_str(), location.country.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = vec![
        Line::from(vec![
            Span::styled(place, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            if report.from_cache {
                Span::styled("  (cached)", Style::default().fg(Color::DarkGray))
            } else {
                Span::raw("")
            },
        ]),
        Line::from(Span::styled(
            format!("{:.3}, {:.3} · {}", location.lat, location.lon, location.timezone),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{}{}", current.temperature, units.temperature_suffix()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {}", current.conditions.join(", "))),
        ]),
        Line::from(""),
        field_line("Feels like", format!("{}{}", current.feels_like, units.temperature_suffix())),
        field_line("Humidity", format!("{}%", current.humidity)),
        field_line(
            "Wind",
            format!("{} {} {}", current.wind_speed, units.speed_suffix(), current.wind_direction),
        ),
        field_line("Pressure", format!("{} mb", current.pressure)),
        field_line("Visibility", current.visibility.to_string()),
        field_line("UV index", current.uv_index.to_string()),
        field_line("Precip", current.precipitation.to_string()),
    ];
    if let Some(observed) = &current.observation_time {
        lines.push(field_line("Observed", observed.as_str()));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}
