use crate::app::{Action, App, Mode};
use crate::event::Key;

/// Handle a key event, returning whatever the main loop must do next.
pub fn handle_key_event(app: &mut App, key: Key) -> Action {
    app.notice = None;
    match app.mode {
        Mode::Picking(_) => handle_picker_key(app, key),
        _ => handle_browse_key(app, key),
    }
}

fn handle_browse_key(app: &mut App, key: Key) -> Action {
    match key {
        Key::Char('q') | Key::Esc | Key::Interrupt => return Action::Quit,
        Key::Up | Key::Char('k') => app.select_previous(),
        Key::Down | Key::Char('j') => app.select_next(),
        Key::Right | Key::Char('l') => app.expand_selected(),
        Key::Left | Key::Char('h') => app.collapse_selected(),
        Key::Enter => return app.activate_selected(),
        Key::Tab => return app.enter_selected_dir(),
        Key::Backspace => return app.enter_parent_dir(),
        Key::Char('f') => return Action::Search,
        Key::Char('r') => app.refresh(),
        Key::Char('g') => app.select_first(),
        Key::Char('G') => app.select_last(),
        _ => {}
    }
    Action::None
}

fn handle_picker_key(app: &mut App, key: Key) -> Action {
    match key {
        Key::Enter => return app.open_picked(),
        Key::Char('q') | Key::Esc | Key::Interrupt => app.close_picker(),
        _ => {
            if let Some(picker) = app.picker_mut() {
                let len = picker.matches.len();
                match key {
                    Key::Up | Key::Char('k') => picker.list.select_previous(),
                    Key::Down | Key::Char('j') => picker.list.select_next(len),
                    Key::Char('g') => picker.list.select_first(),
                    Key::Char('G') => picker.list.select_last(len),
                    _ => {}
                }
            }
        }
    }
    Action::None
}
