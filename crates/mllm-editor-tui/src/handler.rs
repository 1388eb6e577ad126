use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use crate::app::{App, InputMode};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Paste(text) => handle_paste(app, &text),
        AppEvent::Tick => app.tick_animation(),
    }
    app.poll_send_task().await;
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Editing => handle_editing(app, key),
        InputMode::ImagePath => handle_image_path(app, key),
    }
}

fn handle_editing(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('s') => app.send(),
            KeyCode::Char('b') => app.editor.toggle_bold(),
            // Ctrl-I arrives as Tab in most terminals
            KeyCode::Char('t') => app.editor.toggle_italic(),
            KeyCode::Char('o') => app.begin_image_prompt(),
            KeyCode::Char('l') => app.editor.clear(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter => app.editor.newline(),
        KeyCode::Backspace => app.editor.backspace(),
        KeyCode::Delete => app.editor.delete(),
        KeyCode::Left => app.editor.move_left(),
        KeyCode::Right => app.editor.move_right(),
        KeyCode::Up => app.editor.move_up(),
        KeyCode::Down => app.editor.move_down(),
        KeyCode::Home => app.editor.move_home(),
        KeyCode::End => app.editor.move_end(),
        KeyCode::PageUp => app.scroll_transcript_up(app.transcript_height.max(1) / 2),
        KeyCode::PageDown => app.scroll_transcript_down(app.transcript_height.max(1) / 2),
        KeyCode::Tab => app.editor.insert_str("    "),
        KeyCode::Char(c) => app.editor.insert_char(c),
        _ => {}
    }
}

fn handle_image_path(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_image_prompt(),
        KeyCode::Enter => app.insert_image_from_prompt(),
        KeyCode::Backspace => {
            app.image_path_input.pop();
        }
        KeyCode::Char(c) => app.image_path_input.push(c),
        _ => {}
    }
}

fn handle_paste(app: &mut App, text: &str) {
    match app.input_mode {
        InputMode::Editing => app.editor.insert_str(text),
        // Dragging a file onto most terminals pastes its quoted path
        InputMode::ImagePath => {
            let path = text.trim().trim_matches(|c| c == '\'' || c == '"');
            app.image_path_input.push_str(path);
        }
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_transcript_down(3),
        MouseEventKind::ScrollUp => app.scroll_transcript_up(3),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use crossterm::event::KeyEventKind;
    use mllm_editor_core::{Config, ContentItem, extract_content};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> AppEvent {
        AppEvent::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    async fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_event(app, key(KeyCode::Char(c), KeyModifiers::NONE)).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_typing_with_bold_toggle() {
        let mut app = App::new(&Config::new());
        type_str(&mut app, "Hello").await;
        handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::NONE)).await.unwrap();
        handle_event(&mut app, key(KeyCode::Char('b'), KeyModifiers::CONTROL)).await.unwrap();
        type_str(&mut app, " there ").await;

        assert_eq!(app.editor.to_html(), "<p>Hello</p><p><b> there </b></p>");
        let items = extract_content(&app.capture_document()).into_items();
        assert_eq!(items, vec![ContentItem::text("Hello\n there ")]);
    }

    #[tokio::test]
    async fn test_ctrl_c_quits() {
        let mut app = App::new(&Config::new());
        handle_event(&mut app, key(KeyCode::Char('c'), KeyModifiers::CONTROL)).await.unwrap();
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_image_prompt_collects_pasted_path() {
        let mut app = App::new(&Config::new());
        handle_event(&mut app, key(KeyCode::Char('o'), KeyModifiers::CONTROL)).await.unwrap();
        assert_eq!(app.input_mode, InputMode::ImagePath);

        handle_event(&mut app, AppEvent::Paste("'/tmp/cat.png'\n".to_string())).await.unwrap();
        assert_eq!(app.image_path_input, "/tmp/cat.png");

        handle_event(&mut app, key(KeyCode::Esc, KeyModifiers::NONE)).await.unwrap();
        assert_eq!(app.input_mode, InputMode::Editing);
        assert!(!app.should_quit);
    }
}
