// Modal UI components.
// Centered dialogs drawn over the current view.

use ratatui::{prelude::*, widgets::*};

use crate::state::TextInput;

use super::widgets::centered_rect;

/// Clear a centered area, draw a bordered frame, and return the inner area.
pub fn draw_modal_frame(frame: &mut Frame, title: &str, width: u16, height: u16) -> Rect {
    let modal_area = centered_rect(frame.area(), width, height);
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", title))
        .title_bottom(Line::from(" Esc close ").right_aligned());
    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);
    inner
}

/// Single-field prompt, e.g. for a route or a species filter.
pub fn draw_prompt(frame: &mut Frame, title: &str, label: &str, input: &TextInput) {
    let inner = draw_modal_frame(frame, title, 50, 3);
    let line = Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(Color::DarkGray)),
        Span::raw(input.value()),
        Span::styled("█", Style::default().fg(Color::Yellow)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

/// Label/value rows for detail modals.
pub fn field_line<'a>(label: &'a str, value: impl Into<String>) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<12}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value.into(), Style::default().fg(Color::White)),
    ])
}
