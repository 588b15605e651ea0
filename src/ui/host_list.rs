use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::theme;
use crate::app::{App, Mode};
use crate::ssh_config::model::Host;

const MAX_ALIAS_WIDTH: usize = 30;
const MAX_HOSTNAME_WIDTH: usize = 40;
const MAX_USER_WIDTH: usize = 20;

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(1), // header with search query
        Constraint::Min(3),    // column header + host rows
        Constraint::Length(1), // status or key hints
    ])
    .split(area);

    render_header(frame, chunks[0], app);

    // The first row of the list area is the column header; the rest is the
    // scrolling viewport the model's cursor math runs against.
    app.view_height = chunks[1].height.saturating_sub(1).max(1) as usize;
    app.clamp_viewport();
    render_rows(frame, chunks[1], app);

    if app.status.is_some() {
        super::render_status_bar(frame, chunks[2], app);
    } else {
        render_footer(frame, chunks[2], app);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(" skiff ", theme::brand())];
    if matches!(app.mode, Mode::Search) {
        spans.push(Span::raw("  "));
        spans.push(Span::raw(app.search_query.as_str()));
        spans.push(Span::styled("\u{2588}", theme::accent()));
    } else {
        spans.push(Span::styled("  Type to search", theme::muted()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_rows(frame: &mut Frame, area: Rect, app: &App) {
    if app.filtered.is_empty() {
        let msg = Paragraph::new(Span::styled("  No hosts found.", theme::muted()));
        frame.render_widget(msg, area);
        return;
    }

    let (alias_w, host_w, user_w) = column_widths(&app.filtered);

    let header = format!(
        "  {}  {}  {}  GROUPS",
        pad("ALIAS", alias_w),
        pad("HOSTNAME", host_w),
        pad("USER", user_w),
    );
    let mut lines = vec![Line::from(Span::styled(header, theme::muted()))];

    let end = (app.viewport + app.view_height).min(app.filtered.len());
    for i in app.viewport..end {
        lines.push(render_row(app, i, alias_w, host_w, user_w));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_row(app: &App, i: usize, alias_w: usize, host_w: usize, user_w: usize) -> Line<'static> {
    let host = &app.filtered[i];
    let alias = pad(&truncate(&host.alias, alias_w), alias_w);
    let hostname = pad(&truncate(&host.hostname, host_w), host_w);
    let user = if host.user.is_empty() { "-" } else { &host.user };
    let user = pad(&truncate(user, user_w), user_w);
    let groups = host
        .groups
        .iter()
        .map(|g| format!("[{g}]"))
        .collect::<Vec<_>>()
        .join(" ");

    if i == app.cursor {
        // One flat span so the reverse video covers the whole row.
        let mut row = format!("> {alias}  {hostname}  {user}");
        if !groups.is_empty() {
            row.push_str("  ");
            row.push_str(&groups);
        }
        return Line::from(Span::styled(row, theme::selected()));
    }

    let mut spans = vec![
        Span::raw(format!("  {alias}  ")),
        Span::styled(format!("{hostname}  "), theme::muted()),
        Span::styled(user, theme::muted()),
    ];
    if !groups.is_empty() {
        spans.push(Span::styled(format!("  {groups}"), theme::accent()));
    }
    Line::from(spans)
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let footer = Line::from(vec![
        Span::styled(format!(" {} hosts  ", app.filtered.len()), theme::muted()),
        Span::styled("Enter", theme::primary_action()),
        Span::styled(" connect  ", theme::muted()),
        Span::styled("Ctrl+E", theme::accent_bold()),
        Span::styled(" edit  ", theme::muted()),
        Span::styled("Ctrl+K", theme::accent_bold()),
        Span::styled(" key  ", theme::muted()),
        Span::styled("Esc", theme::accent_bold()),
        Span::styled(" quit", theme::muted()),
    ]);
    frame.render_widget(Paragraph::new(footer), area);
}

/// Per-column widths from the visible hosts, floored at the header labels
/// and capped so one long name cannot eat the screen.
fn column_widths(hosts: &[Host]) -> (usize, usize, usize) {
    let mut alias_w = "ALIAS".len();
    let mut host_w = "HOSTNAME".len();
    let mut user_w = "USER".len();
    for h in hosts {
        alias_w = alias_w.max(h.alias.chars().count());
        host_w = host_w.max(h.hostname.chars().count());
        user_w = user_w.max(h.user.chars().count());
    }
    (
        alias_w.min(MAX_ALIAS_WIDTH),
        host_w.min(MAX_HOSTNAME_WIDTH),
        user_w.min(MAX_USER_WIDTH),
    )
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - len))
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('~');
    out
}
