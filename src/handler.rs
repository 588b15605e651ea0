use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Mode};

/// Handle a key event based on the current mode. Every key maps to an
/// action, a mode change, or is ignored.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    // Ctrl+C quits from every mode.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.running = false;
        return Ok(());
    }

    match app.mode {
        Mode::Normal => handle_normal(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Edit(_) => handle_edit(app, key),
        Mode::IdentityPicker { .. } => handle_identity_picker(app, key),
    }
    Ok(())
}

fn handle_normal(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('e') => app.open_edit_form(),
            KeyCode::Char('k') => app.open_identity_picker(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.running = false,
        KeyCode::Down => app.move_cursor_down(),
        KeyCode::Up => app.move_cursor_up(),
        KeyCode::Enter => app.connect_selected(String::new()),
        // Any printable rune starts a search with itself as the query.
        KeyCode::Char(c) => {
            app.mode = Mode::Search;
            app.search_query = c.to_string();
            app.apply_search();
        }
        _ => {}
    }
}

fn handle_search(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('w') => {
                app.search_query.clear();
                app.apply_search();
                app.mode = Mode::Normal;
            }
            KeyCode::Char('e') => app.open_edit_form(),
            KeyCode::Char('k') => app.open_identity_picker(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.search_query.clear();
            app.apply_search();
            app.mode = Mode::Normal;
        }
        KeyCode::Enter => app.connect_selected(String::new()),
        KeyCode::Down => app.move_cursor_down(),
        KeyCode::Up => app.move_cursor_up(),
        KeyCode::Backspace => {
            app.search_query.pop();
            app.apply_search();
            if app.search_query.is_empty() {
                app.mode = Mode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.search_query.push(c);
            app.apply_search();
        }
        _ => {}
    }
}

fn handle_edit(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('u') {
            if let Mode::Edit(form) = &mut app.mode {
                form.active_value_mut().clear();
                form.status = None;
            }
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.mode = Mode::Normal,
        KeyCode::Enter => app.save_edit(),
        KeyCode::Down => {
            if let Mode::Edit(form) = &mut app.mode {
                form.active = form.active.next();
            }
        }
        KeyCode::Up => {
            if let Mode::Edit(form) = &mut app.mode {
                form.active = form.active.prev();
            }
        }
        KeyCode::Backspace => {
            if let Mode::Edit(form) = &mut app.mode {
                form.active_value_mut().pop();
                form.status = None;
            }
        }
        KeyCode::Char(c) => {
            if let Mode::Edit(form) = &mut app.mode {
                form.active_value_mut().push(c);
                form.status = None;
            }
        }
        _ => {}
    }
}

fn handle_identity_picker(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.mode = Mode::Normal,
        KeyCode::Down => {
            if let Mode::IdentityPicker { keys, cursor } = &mut app.mode {
                if !keys.is_empty() {
                    *cursor = (*cursor + 1) % keys.len();
                }
            }
        }
        KeyCode::Up => {
            if let Mode::IdentityPicker { keys, cursor } = &mut app.mode {
                if !keys.is_empty() {
                    *cursor = (*cursor + keys.len() - 1) % keys.len();
                }
            }
        }
        KeyCode::Enter => {
            let identity = match &app.mode {
                Mode::IdentityPicker { keys, cursor } => keys
                    .get(*cursor)
                    .map(|k| k.to_string_lossy().to_string())
                    .unwrap_or_default(),
                _ => return,
            };
            app.mode = Mode::Normal;
            app.connect_selected(identity);
        }
        _ => {}
    }
}
