pub struct Keybinds;

impl Default for Keybinds {
    fn default() -> Self {
        Self
    }
}

impl Keybinds {
    pub fn help_text(&self) -> String {
        r#"Keyboard Shortcuts:

Accounts:
  ↑ / ↓         Move the selection
  j / k         Move the selection
  Click         Select an account
  /             Filter accounts

Authorization:
  a / Enter     Request Gmail authorization for the selection
  d             Revoke the selection's authorization
  Enter         Interpret the pasted redirect URL (while waiting)
  Ctrl + O      Reopen the consent page in the browser
  Esc           Back to the account list (while waiting)

Session:
  r             Reload accounts / start over
  Shift + E     Show latest error details
  ?             Toggle this help
  q / Ctrl + Q  Quit

Mouse:
  Scroll        Scroll the result
  Click + drag  Resize the account panel
"#
        .to_string()
    }
}
