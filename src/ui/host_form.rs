use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use super::theme;
use crate::app::{App, EditForm, Field, Mode};

fn placeholder_for(field: Field) -> &'static str {
    match field {
        Field::Alias => "my-server",
        Field::Hostname => "192.168.1.1 or example.com",
        Field::User => "root",
        Field::Port => "22",
        Field::IdentityFile => "~/.ssh/id_ed25519",
        Field::Groups => "Work, Staging",
    }
}

pub fn render(frame: &mut Frame, app: &mut App) {
    let Mode::Edit(form) = &app.mode else {
        return;
    };

    let form_area = super::centered_rect(70, 85, frame.area());
    frame.render_widget(Clear, form_area);

    let outer = Block::default()
        .title(Span::styled(" Edit Host ", theme::brand()))
        .borders(Borders::ALL)
        .border_style(theme::border());
    let inner = outer.inner(form_area);
    frame.render_widget(outer, form_area);

    let chunks = Layout::vertical([
        Constraint::Length(3), // Alias
        Constraint::Length(3), // Hostname
        Constraint::Length(3), // User
        Constraint::Length(3), // Port
        Constraint::Length(3), // IdentityFile
        Constraint::Length(3), // Groups
        Constraint::Min(0),    // spacer
        Constraint::Length(1), // status or footer
    ])
    .split(inner);

    for (i, field) in Field::ALL.into_iter().enumerate() {
        render_field(frame, chunks[i], field, form);
    }

    if let Some(status) = &form.status {
        let line = Line::from(vec![
            Span::styled("! ", theme::error()),
            Span::styled(status.as_str(), theme::error()),
        ]);
        frame.render_widget(Paragraph::new(line), chunks[7]);
    } else {
        let footer = Line::from(vec![
            Span::styled(" Enter", theme::primary_action()),
            Span::styled(" save  ", theme::muted()),
            Span::styled("\u{2191}/\u{2193}", theme::accent_bold()),
            Span::styled(" field  ", theme::muted()),
            Span::styled("Ctrl+U", theme::accent_bold()),
            Span::styled(" clear  ", theme::muted()),
            Span::styled("Esc", theme::accent_bold()),
            Span::styled(" cancel", theme::muted()),
        ]);
        frame.render_widget(Paragraph::new(footer), chunks[7]);
    }
}

fn render_field(frame: &mut Frame, area: Rect, field: Field, form: &EditForm) {
    let is_active = form.active == field;
    let value = form.value(field);

    let (border_style, label_style) = if is_active {
        (theme::border_focused(), theme::accent_bold())
    } else {
        (theme::border(), theme::muted())
    };

    let is_required = matches!(field, Field::Alias | Field::Hostname);
    let label = if is_required {
        format!(" {}* ", field.label())
    } else {
        format!(" {} ", field.label())
    };

    let block = Block::default()
        .title(Span::styled(label, label_style))
        .borders(Borders::ALL)
        .border_style(border_style);

    let display: Span = if value.is_empty() && !is_active {
        Span::styled(placeholder_for(field), theme::muted())
    } else {
        Span::raw(value)
    };
    frame.render_widget(Paragraph::new(display).block(block), area);

    // Block cursor at the end of the active field; width-aware so
    // multibyte input places it correctly.
    if is_active {
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(value.width().min(u16::MAX as usize) as u16);
        let cursor_y = area.y + 1;
        if cursor_x < area.x + area.width.saturating_sub(1) {
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }
}
