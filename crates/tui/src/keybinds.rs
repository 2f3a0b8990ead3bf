pub struct Keybinds;

impl Default for Keybinds {
    fn default() -> Self {
        Self
    }
}

impl Keybinds {
    pub fn help_text(&self) -> String {
        r#"Keyboard Shortcuts:

Button:
  Enter / Space Start authorization

Authorization dialog:
  Type / paste  Enter the authorization code
  Alt + Enter   Insert a newline
  Backspace     Delete last character
  Ctrl + U      Clear the code
  Enter         Confirm authorization
  Ctrl + R      Reopen the authorization page
  Esc           Cancel

General:
  ?             Toggle this help
  Ctrl + Q      Quit
"#
        .to_string()
    }
}
