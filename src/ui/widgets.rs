// Shared rendering helpers.
// Loading, error, and empty states plus small layout and formatting utilities.

use ratatui::{prelude::*, widgets::*};

use crate::state::SearchBox;

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(text, area);
}

/// Render an error message with the retry control.
pub fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let lines = vec![
        Line::from(Span::styled(format!("❌ {}", error), Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(vec![
            Span::styled("r", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(" Retry", Style::default().fg(Color::DarkGray)),
        ]),
    ];
    let text = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

/// Highlight style shared by every list.
pub fn highlight_style() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}

/// A rect of the given size centered in `area`, clamped to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// One-line search field. Shows the cursor while editing and the applied term otherwise.
pub fn search_line<'a>(label: &'a str, search: &'a SearchBox) -> Line<'a> {
    if search.editing {
        let mut spans = vec![
            Span::styled(format!("{}: ", label), Style::default().fg(Color::Yellow)),
            Span::raw(search.input.value()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ];
        if search.is_settling() {
            spans.push(Span::styled(" …", Style::default().fg(Color::DarkGray)));
        }
        Line::from(spans)
    } else if search.input.is_empty() {
        Line::from(vec![
            Span::styled("/", Style::default().fg(Color::Cyan)),
            Span::styled(format!(" {}", label), Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![
            Span::styled(format!("{}: ", label), Style::default().fg(Color::DarkGray)),
            Span::styled(search.input.value(), Style::default().fg(Color::White)),
        ])
    }
}

/// Key hint pair for status lines.
pub fn hint<'a>(key: &'a str, action: &'a str) -> Vec<Span<'a>> {
    vec![
        Span::raw(format!(" {} ", key)),
        Span::styled(format!("{} ", action), Style::default().fg(Color::DarkGray)),
    ]
}

/// Group digits in thousands, e.g. `32971846` → `32,971,846`.
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Truncate to `max` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(32971846), "32,971,846");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer title", 6), "a lon…");
    }

    #[test]
    fn test_centered_rect_clamps() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_rect(area, 20, 4), Rect::new(10, 3, 20, 4));
        assert_eq!(centered_rect(area, 80, 40), area);
    }

    #[test]
    fn test_search_line_marks_unapplied_text() {
        use crate::state::SearchBox;
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
        use std::time::{Duration, Instant};

        let text = |line: Line| line.spans.iter().map(|s| s.content.to_string()).collect::<String>();
        let start = Instant::now();
        let mut search = SearchBox::new(Duration::from_millis(300));
        search.begin_editing();
        search.handle_key(&KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE), start);
        assert!(text(search_line("Search", &search)).ends_with(" …"));

        search.poll(start + Duration::from_millis(300));
        assert_eq!(text(search_line("Search", &search)), "Search: a█");
    }
}
