// Characters view rendering.

use ratatui::{prelude::*, widgets::*};

use crate::api::Character;
use crate::state::{CharactersPage, LoadingState};

use super::modal::{draw_modal_frame, draw_prompt, field_line};
use super::widgets::{highlight_style, render_empty, render_error, render_loading, search_line};

fn status_color(status: &str) -> Color {
    match status.to_ascii_lowercase().as_str() {
        "alive" => Color::Green,
        "dead" => Color::Red,
        _ => Color::Gray,
    }
}

pub fn draw_characters(frame: &mut Frame, page: &mut CharactersPage, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    frame.render_widget(Paragraph::new(search_line("Search by name", &page.name_search)), chunks[0]);

    let query = &page.query;
    let filters = Line::from(vec![
        Span::styled(" status ", Style::default().fg(Color::DarkGray)),
        Span::raw(query.status.map(|s| s.as_param()).unwrap_or("any")),
        Span::styled("  gender ", Style::default().fg(Color::DarkGray)),
        Span::raw(query.gender.map(|g| g.as_param()).unwrap_or("any")),
        Span::styled("  species ", Style::default().fg(Color::DarkGray)),
        Span::raw(query.species.as_deref().unwrap_or("any")),
        Span::styled("  order ", Style::default().fg(Color::DarkGray)),
        Span::raw(page.sort.map(|o| o.arrow()).unwrap_or("-")),
    ]);
    frame.render_widget(Paragraph::new(filters), chunks[1]);

    let title = match page.data.data() {
        Some(data) if data.info.pages > 0 => format!(
            " Characters · page {}/{} · {} total ",
            query.page, data.info.pages, data.info.count
        ),
        _ => " Characters ".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(chunks[2]);
    frame.render_widget(block, chunks[2]);

    match &page.data {
        LoadingState::Idle => render_empty(frame, inner, "Press r to load characters"),
        LoadingState::Loading => render_loading(frame, inner, "Loading characters"),
        LoadingState::Error(e) => render_error(frame, inner, e),
        LoadingState::Loaded(data) => {
            if data.results.is_empty() {
                let message = if page.query.is_filtered() {
                    "No characters match these filters"
                } else {
                    "No characters available"
                };
                render_empty(frame, inner, message);
            } else {
                let items: Vec<ListItem> = page
                    .visible_characters()
                    .into_iter()
                    .map(|c| {
                        ListItem::new(Line::from(vec![
                            Span::styled("● ", Style::default().fg(status_color(&c.status))),
                            Span::styled(c.name.clone(), Style::default().fg(Color::Cyan)),
                            Span::styled(
                                format!("  {} · {}", c.species, c.gender),
                                Style::default().fg(Color::DarkGray),
                            ),
                        ]))
                    })
                    .collect();
                let list = List::new(items)
                    .highlight_style(highlight_style())
                    .highlight_symbol("> ");
                frame.render_stateful_widget(list, inner, &mut page.selection.list_state);
            }
        }
    }

    if let Some(input) = &page.species_input {
        draw_prompt(frame, "Filter by species", "Species", input);
    }
    if let Some(character) = &page.detail {
        draw_detail(frame, character);
    }
}

fn draw_detail(frame: &mut Frame, character: &Character) {
    let inner = draw_modal_frame(frame, &character.name, 60, 12);
    let kind = if character.kind.is_empty() { "-" } else { character.kind.as_str() };
    let lines = vec![
        Line::from(vec![
            Span::styled("● ", Style::default().fg(status_color(&character.status))),
            Span::raw(character.status.as_str()),
        ]),
        Line::from(""),
        field_line("Species", character.species.as_str()),
        field_line("Type", kind),
        field_line("Gender", character.gender.as_str()),
        field_line("Origin", character.origin.name.as_str()),
        field_line("Location", character.location.name.as_str()),
        field_line("Episodes", character.episode.len().to_string()),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}
