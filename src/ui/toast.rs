// Toast stack in the top-right corner.

use ratatui::{prelude::*, widgets::*};

use crate::state::{ToastKind, Toasts};

const TOAST_WIDTH: u16 = 44;

fn kind_color(kind: ToastKind) -> Color {
    match kind {
        ToastKind::Success => Color::Green,
        ToastKind::Info => Color::Cyan,
        ToastKind::Warning => Color::Yellow,
        ToastKind::Error => Color::Red,
    }
}

pub fn draw_toasts(frame: &mut Frame, toasts: &Toasts, area: Rect) {
    if toasts.is_empty() {
        return;
    }
    let width = TOAST_WIDTH.min(area.width);
    let x = area.x + area.width.saturating_sub(width);
    let mut y = area.y;

    for toast in toasts.iter() {
        if y + 3 > area.y + area.height {
            break;
        }
        let color = kind_color(toast.kind);
        let toast_area = Rect::new(x, y, width, 3);
        frame.render_widget(Clear, toast_area);
        let text = Paragraph::new(Line::from(vec![
            Span::styled(format!("{} ", toast.kind.label()), Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::raw(toast.message.as_str()),
        ]))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));
        frame.render_widget(text, toast_area);
        y += 3;
    }
}
