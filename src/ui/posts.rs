// Posts view rendering.

use ratatui::{prelude::*, widgets::*};

use crate::state::{FormField, LoadingState, PostDetail, PostForm, PostsPage};

use super::modal::draw_modal_frame;
use super::widgets::{highlight_style, render_empty, render_error, render_loading, search_line, truncate};

pub fn draw_posts(frame: &mut Frame, page: &mut PostsPage, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    frame.render_widget(Paragraph::new(search_line("Search posts", &page.search)), chunks[0]);

    let title = match page.posts.data() {
        Some(posts) => format!(" Posts ({}/{}) · sort: {} ", page.visible.len(), posts.len(), page.sort.label()),
        None => " Posts ".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    match &page.posts {
        LoadingState::Idle => render_empty(frame, inner, "Press r to load posts"),
        LoadingState::Loading => render_loading(frame, inner, "Loading posts"),
        LoadingState::Error(e) => render_error(frame, inner, e),
        LoadingState::Loaded(posts) => {
            if posts.is_empty() {
                render_empty(frame, inner, "No posts available");
            } else if page.visible.is_empty() {
                render_empty(frame, inner, "No matches found");
            } else {
                let width = inner.width.saturating_sub(8) as usize;
                let items: Vec<ListItem> = page
                    .visible_posts()
                    .into_iter()
                    .map(|post| {
                        let title_style = if page.is_deleting(post.id) {
                            Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
                        } else {
                            Style::default().fg(Color::Cyan)
                        };
                        ListItem::new(Line::from(vec![
                            Span::styled(format!("#{:<4}", post.id), Style::default().fg(Color::DarkGray)),
                            Span::styled(truncate(&post.title, width), title_style),
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

    if let Some(detail) = &page.detail {
        draw_detail(frame, detail);
    }
    if let Some(form) = &page.form {
        draw_form(frame, form);
    }
}

fn draw_detail(frame: &mut Frame, detail: &PostDetail) {
    let area = frame.area();
    let inner = draw_modal_frame(
        frame,
        &format!("Post #{}", detail.post.id),
        area.width.saturating_sub(10).max(40),
        area.height.saturating_sub(6).max(10),
    );

    let mut lines = vec![
        Line::from(Span::styled(
            detail.post.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("by user {}", detail.post.user_id),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];
    lines.extend(detail.post.body.lines().map(Line::from));
    lines.push(Line::from(""));

    match &detail.comments {
        LoadingState::Idle | LoadingState::Loading => {
            lines.push(Line::from(Span::styled("⏳ Loading comments...", Style::default().fg(Color::Yellow))));
        }
        LoadingState::Error(e) => {
            lines.push(Line::from(Span::styled(format!("❌ {}", e), Style::default().fg(Color::Red))));
        }
        LoadingState::Loaded(comments) => {
            lines.push(Line::from(Span::styled(
                format!("Comments ({})", comments.len()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            for comment in comments {
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled(comment.name.as_str(), Style::default().fg(Color::Cyan)),
                    Span::styled(format!("  <{}>", comment.email), Style::default().fg(Color::DarkGray)),
                ]));
                lines.extend(comment.body.lines().map(Line::from));
            }
        }
    }

    let text = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((detail.scroll, 0));
    frame.render_widget(text, inner);
}

fn draw_form(frame: &mut Frame, form: &PostForm) {
    let title = match form.editing {
        Some(id) => format!("Edit Post #{}", id),
        None => "New Post".to_string(),
    };
    let inner = draw_modal_frame(frame, &title, 64, 11);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Body
            Constraint::Length(1), // Error
            Constraint::Min(1),    // Hints
        ])
        .split(inner);

    let field = |label: &'static str, value: &str, focused: bool| {
        let border = if focused { Color::Yellow } else { Color::DarkGray };
        let mut spans = vec![Span::raw(value.to_string())];
        if focused {
            spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
        }
        Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(format!(" {} ", label)),
        )
    };

    frame.render_widget(field("Title", form.title.value(), form.focus == FormField::Title), chunks[0]);
    frame.render_widget(field("Body", form.body.value(), form.focus == FormField::Body), chunks[1]);

    if let Some(error) = &form.error {
        frame.render_widget(
            Paragraph::new(Span::styled(format!("❌ {}", error), Style::default().fg(Color::Red))),
            chunks[2],
        );
    }

    let hints = if form.submitting {
        Line::from(Span::styled("⏳ Submitting...", Style::default().fg(Color::Yellow)))
    } else {
        Line::from(Span::styled(
            "Tab switch field · Enter submit · Esc cancel",
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(hints), chunks[3]);
}
