use super::*;

impl App {
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key),
            Event::Paste(text) => {
                self.edit_code(|code| code.push_str(&text));
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<bool> {
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return Ok(true);
        }

        if self.show_help {
            if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
                self.show_help = false;
            }
            return Ok(false);
        }

        if self.controller.session().is_dialog_open() {
            self.handle_dialog_key(key);
            return Ok(false);
        }

        match key.code {
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Enter | KeyCode::Char(' ') => self.controller.start_auth(),
            KeyCode::Esc => self.last_toast = None,
            _ => {}
        }
        Ok(false)
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Esc => self.controller.cancel(),
            KeyCode::Char('r') if ctrl => self.controller.reopen_popup(),
            KeyCode::Char('u') if ctrl => self.controller.set_code(""),
            KeyCode::Enter if alt => self.edit_code(|code| code.push('\n')),
            KeyCode::Enter => self.controller.submit(),
            KeyCode::Backspace => self.edit_code(|code| {
                code.pop();
            }),
            // AltGr arrives as Ctrl+Alt on some platforms.
            KeyCode::Char(c) if !ctrl || alt => self.edit_code(|code| code.push(c)),
            _ => {}
        }
    }

    fn edit_code(&mut self, edit: impl FnOnce(&mut String)) {
        if let AuthSession::AwaitingCode { code_input, .. } = self.controller.session() {
            let mut code = code_input.clone();
            edit(&mut code);
            self.controller.set_code(code);
        }
    }
}
