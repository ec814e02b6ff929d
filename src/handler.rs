use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            // A finished request is folded into the transcript here, on the
            // same task that handles key events.
            if app.conversation.poll_completion().await {
                app.scroll_chat_to_bottom();
            }
            app.tick_animation();
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,

        KeyCode::Enter => {
            // Rejected while a reply is pending or when the draft is blank;
            // the draft survives a rejection.
            if app.conversation.submit_draft() {
                app.input_cursor = 0;
                app.scroll_chat_to_bottom();
            }
        }

        KeyCode::Backspace => {
            if app.input_cursor > 0 {
                let byte_pos = char_to_byte_index(app.conversation.draft(), app.input_cursor - 1);
                app.conversation.draft_mut().remove(byte_pos);
                app.input_cursor -= 1;
            }
        }
        KeyCode::Left => {
            app.input_cursor = app.input_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let len = app.conversation.draft().chars().count();
            app.input_cursor = (app.input_cursor + 1).min(len);
        }
        KeyCode::Home => {
            app.input_cursor = 0;
        }
        KeyCode::End => {
            app.input_cursor = app.conversation.draft().chars().count();
        }

        KeyCode::Up | KeyCode::PageUp => app.scroll_chat_up(),
        KeyCode::Down | KeyCode::PageDown => app.scroll_chat_down(),

        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(app.conversation.draft(), app.input_cursor);
            app.conversation.draft_mut().insert(byte_pos, c);
            app.input_cursor += 1;
        }
        _ => {}
    }
}
