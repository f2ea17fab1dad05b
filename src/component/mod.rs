use async_trait::async_trait;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{Frame, layout::Rect};

use crate::{
    app::Action,
    config::{KeyBindingAction, KeyBindingsConfig},
    process::ProcessOutput,
};

pub mod grid;

/// An interactive screen of the TUI.
///
/// The app drives it with ticks, renders and input events until an [`Action::Quit`] is returned. Every input hook
/// defaults to a no-op, so components only implement what they react to.
#[async_trait]
pub trait Component: Send {
    /// Name of the component, used on logs
    fn name(&self) -> &'static str;

    /// Starts the background work of the component, right before it's displayed.
    ///
    /// Returning [`Action::Quit`] skips the TUI altogether.
    async fn init_and_peek(&mut self) -> Result<Action> {
        Ok(Action::NoOp)
    }

    /// Stops the background work of the component, called once the TUI is closed for whatever reason
    fn unmount(&mut self) {}

    /// Periodic update, independent from renders and input
    fn tick(&mut self) -> Result<Action> {
        Ok(Action::NoOp)
    }

    /// Draws the component on the given area of the frame
    fn render(&mut self, frame: &mut Frame, area: Rect);

    /// Called when the user wants to leave, returns the output to exit with or [None] to keep running
    fn exit(&mut self) -> Result<Option<ProcessOutput>> {
        Ok(Some(ProcessOutput::success()))
    }

    /// Pasted text is inserted as if it was typed
    fn process_paste_event(&mut self, content: String) -> Result<Action> {
        self.insert_text(content)
    }

    /// Processes a key press, see [`default_process_key_event`](Component::default_process_key_event)
    async fn process_key_event(&mut self, keybindings: &KeyBindingsConfig, key: KeyEvent) -> Result<Action> {
        Ok(self
            .default_process_key_event(keybindings, key)
            .await?
            .unwrap_or_default())
    }

    /// Maps the key to the configured bindings first and then to the fixed editing keys, calling the matching hook.
    ///
    /// Returns [None] when the key means nothing to this component.
    async fn default_process_key_event(
        &mut self,
        keybindings: &KeyBindingsConfig,
        key: KeyEvent,
    ) -> Result<Option<Action>> {
        if let Some(action) = keybindings.get_action_matching(&key) {
            return Ok(Some(match action {
                KeyBindingAction::Quit => self.exit()?.map(Action::Quit).unwrap_or_default(),
                KeyBindingAction::Search => self.activate_search()?,
                KeyBindingAction::Confirm => self.selection_confirm().await?,
                KeyBindingAction::Refresh => self.refresh()?,
            }));
        }

        let Some(edit) = EditKey::from_key(key) else {
            return Ok(None);
        };
        Ok(Some(match edit {
            EditKey::Home => self.move_home()?,
            EditKey::End => self.move_end()?,
            EditKey::Up => self.move_up()?,
            EditKey::Down => self.move_down()?,
            EditKey::Left { word } => self.move_left(word)?,
            EditKey::Right { word } => self.move_right(word)?,
            EditKey::Delete { backspace, word } => self.delete(backspace, word)?,
            EditKey::Insert(c) => self.insert_char(c)?,
        }))
    }

    /// Processes a mouse event, only received when mouse capture is enabled
    fn process_mouse_event(&mut self, mouse: MouseEvent) -> Result<Action> {
        let _ = mouse;
        Ok(Action::NoOp)
    }

    /// Moves one step up
    fn move_up(&mut self) -> Result<Action> {
        Ok(Action::NoOp)
    }

    /// Moves one step down
    fn move_down(&mut self) -> Result<Action> {
        Ok(Action::NoOp)
    }

    /// Moves one step left, or a whole word if `word` is set and a text input is focused
    fn move_left(&mut self, word: bool) -> Result<Action> {
        let _ = word;
        Ok(Action::NoOp)
    }

    /// Moves one step right, or a whole word if `word` is set and a text input is focused
    fn move_right(&mut self, word: bool) -> Result<Action> {
        let _ = word;
        Ok(Action::NoOp)
    }

    fn move_home(&mut self) -> Result<Action> {
        Ok(Action::NoOp)
    }

    fn move_end(&mut self) -> Result<Action> {
        Ok(Action::NoOp)
    }

    fn insert_text(&mut self, text: String) -> Result<Action> {
        _ = text;
        Ok(Action::NoOp)
    }

    fn insert_char(&mut self, c: char) -> Result<Action> {
        _ = c;
        Ok(Action::NoOp)
    }

    /// Deletes the char (or word) before the cursor when `backspace` is set, or the one after it otherwise
    fn delete(&mut self, backspace: bool, word: bool) -> Result<Action> {
        _ = backspace;
        _ = word;
        Ok(Action::NoOp)
    }

    /// Focuses the search input
    fn activate_search(&mut self) -> Result<Action> {
        Ok(Action::NoOp)
    }

    /// Confirms the current selection
    async fn selection_confirm(&mut self) -> Result<Action> {
        Ok(Action::NoOp)
    }

    /// Reloads the data displayed
    fn refresh(&mut self) -> Result<Action> {
        Ok(Action::NoOp)
    }
}

/// Editing and movement keys that can't be rebound
#[derive(Debug, PartialEq, Eq)]
enum EditKey {
    Home,
    End,
    Up,
    Down,
    Left { word: bool },
    Right { word: bool },
    Delete { backspace: bool, word: bool },
    Insert(char),
}

impl EditKey {
    fn from_key(key: KeyEvent) -> Option<Self> {
        let ctrl = key.modifiers == KeyModifiers::CONTROL;
        Some(match key.code {
            KeyCode::Home => Self::Home,
            KeyCode::End => Self::End,
            KeyCode::Up => Self::Up,
            KeyCode::Down => Self::Down,
            KeyCode::Left => Self::Left { word: ctrl },
            KeyCode::Right => Self::Right { word: ctrl },
            KeyCode::Backspace => Self::Delete { backspace: true, word: ctrl },
            KeyCode::Delete => Self::Delete { backspace: false, word: ctrl },
            // Emacs-like shortcuts
            KeyCode::Char(c) if ctrl => match c {
                'a' => Self::Home,
                'e' => Self::End,
                'p' => Self::Up,
                'n' => Self::Down,
                'h' => Self::Delete { backspace: true, word: false },
                'w' => Self::Delete { backspace: true, word: true },
                'd' => Self::Delete { backspace: false, word: false },
                _ => return None,
            },
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => Self::Insert(c),
            _ => return None,
        })
    }
}

/// Renders nothing and ignores every event, active until the real component is mounted
pub struct EmptyComponent;
impl Component for EmptyComponent {
    fn name(&self) -> &'static str {
        "EmptyComponent"
    }

    fn render(&mut self, _frame: &mut Frame, _area: Rect) {}
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_edit_keys() {
        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);
        assert_eq!(EditKey::from_key(ctrl('a')), Some(EditKey::Home));
        assert_eq!(EditKey::from_key(ctrl('n')), Some(EditKey::Down));
        assert_eq!(
            EditKey::from_key(ctrl('w')),
            Some(EditKey::Delete {
                backspace: true,
                word: true
            })
        );
        assert_eq!(
            EditKey::from_key(KeyEvent::new(KeyCode::Left, KeyModifiers::CONTROL)),
            Some(EditKey::Left { word: true })
        );
        assert_eq!(
            EditKey::from_key(KeyEvent::new(KeyCode::Char('N'), KeyModifiers::SHIFT)),
            Some(EditKey::Insert('N'))
        );
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(EditKey::from_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL)), None);
        assert_eq!(EditKey::from_key(KeyEvent::new(KeyCode::Char('p'), KeyModifiers::ALT)), None);
        assert_eq!(EditKey::from_key(KeyEvent::from(KeyCode::Tab)), None);
    }
}
