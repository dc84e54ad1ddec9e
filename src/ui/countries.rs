// Countries view rendering.

use ratatui::{prelude::*, widgets::*};

use crate::api::Country;
use crate::state::{CountriesPage, LoadingState};

use super::modal::{draw_modal_frame, field_line};
use super::widgets::{format_number, highlight_style, render_empty, render_error, render_loading, search_line};

pub fn draw_countries(frame: &mut Frame, page: &mut CountriesPage, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let mut header = search_line("Search countries", &page.search);
    header.spans.push(Span::styled("   region ", Style::default().fg(Color::DarkGray)));
    header.spans.push(Span::raw(page.region.clone().unwrap_or_else(|| "all".to_string())));
    header.spans.push(Span::styled("  sort ", Style::default().fg(Color::DarkGray)));
    header.spans.push(Span::raw(page.sort.label()));
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let title = if page.countries.is_loaded() {
        format!(
            " Countries ({}) · page {}/{} ",
            page.visible.len(),
            page.pagination.page + 1,
            page.total_pages()
        )
    } else {
        " Countries ".to_string()
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    match &page.countries {
        LoadingState::Idle => render_empty(frame, inner, "Press r to load countries"),
        LoadingState::Loading => render_loading(frame, inner, "Loading countries"),
        LoadingState::Error(e) => render_error(frame, inner, e),
        LoadingState::Loaded(countries) => {
            if countries.is_empty() {
                render_empty(frame, inner, "No countries available");
            } else if page.visible.is_empty() {
                render_empty(frame, inner, "No matches found");
            } else {
                let items: Vec<ListItem> = page
                    .page_countries()
                    .into_iter()
                    .map(|c| {
                        ListItem::new(Line::from(vec![
                            Span::styled(format!("{:<4}", c.cca3), Style::default().fg(Color::DarkGray)),
                            Span::styled(format!("{:<32}", c.name.common), Style::default().fg(Color::Cyan)),
                            Span::raw(format!("{:>15}", format_number(c.population))),
                            Span::styled(format!("  {}", c.region), Style::default().fg(Color::DarkGray)),
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

    if let Some(country) = &page.detail {
        draw_detail(frame, country);
    }
}

fn draw_detail(frame: &mut Frame, country: &Country) {
    let inner = draw_modal_frame(frame, &country.name.common, 64, 11);
    let lines = vec![
        field_line("Official", country.name.official.as_str()),
        field_line("Code", country.cca3.as_str()),
        field_line("Capital", country.capital().unwrap_or("-")),
        field_line("Region", country.region.as_str()),
        field_line("Subregion", country.subregion.as_deref().unwrap_or("-")),
        field_line("Population", format_number(country.population)),
        field_line("Flag", country.flags.png.as_deref().unwrap_or("-")),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}
