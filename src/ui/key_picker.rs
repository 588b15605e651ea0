use ratatui::Frame;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::theme;
use crate::app::{App, Mode};
use crate::keys;

pub fn render(frame: &mut Frame, app: &mut App) {
    let Mode::IdentityPicker { keys: key_paths, cursor } = &app.mode else {
        return;
    };

    let height = (key_paths.len() as u16 + 2).min(14);
    let area = super::centered_rect_fixed(50, height, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(" Connect with key ", theme::brand()))
        .borders(Borders::ALL)
        .border_style(theme::border_focused());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible = inner.height as usize;
    let top = cursor.saturating_sub(visible.saturating_sub(1));
    let lines: Vec<Line> = key_paths
        .iter()
        .enumerate()
        .skip(top)
        .take(visible)
        .map(|(i, path)| {
            let label = keys::key_label(path);
            if i == *cursor {
                Line::from(Span::styled(format!("> {label}"), theme::selected()))
            } else {
                Line::from(Span::styled(format!("  {label}"), theme::bold()))
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
