mod host_form;
mod host_list;
mod key_picker;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, Mode};

const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 8;

/// Top-level render dispatcher. The host list is always the backdrop;
/// the edit form and identity picker draw over it.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = Paragraph::new("Terminal too small. Need at least 40x8.").style(theme::error());
        frame.render_widget(msg, area);
        return;
    }

    host_list::render(frame, app);

    match &app.mode {
        Mode::Edit(_) => host_form::render(frame, app),
        Mode::IdentityPicker { .. } => key_picker::render(frame, app),
        _ => {}
    }
}

/// Render the transient status message into `area`.
pub fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    if let Some(status) = &app.status {
        let line = if status.is_error {
            Line::from(vec![
                Span::styled("! ", theme::error()),
                Span::styled(status.text.as_str(), theme::error()),
            ])
        } else {
            Line::from(Span::styled(status.text.as_str(), theme::success()))
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Centered rect of the given percentage of the parent.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(vertical[1])[1]
}

/// Centered rect with fixed dimensions.
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
