//! Key mapping for the browser
//!
//! Terminal keys are translated into framework-neutral [`Command`] values
//! before they reach the browser model, so the model and its tests never
//! depend on iocraft's event types.

use iocraft::prelude::{KeyCode, KeyModifiers};

use super::focus::Pane;
use super::list::ListKey;

/// Something the user asked the browser to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    ToggleHelp,
    CycleFocus,
    Cancel,
    FocusSearch,
    Refresh,
    Pull,
    List(ListKey),
    SearchInput(char),
    SearchBackspace,
    SearchSubmit,
}

/// Action to take based on search input handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAction {
    /// Clear search query and leave the search bar (Esc)
    ClearAndExit,
    /// Keep the query and go to the repositories (Enter)
    Submit,
    /// Move focus along the ring (Tab)
    Cycle,
    /// Exit application (Ctrl+Q / Ctrl+C)
    Quit,
    /// Edit the query
    Edit(Option<char>),
    Ignore,
}

/// Handle keys while the search bar has focus.
///
/// Printable characters, including `q` and `h`, go into the query.
pub fn handle_search_input(key_code: KeyCode, modifiers: KeyModifiers) -> SearchAction {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match key_code {
        KeyCode::Esc => SearchAction::ClearAndExit,
        KeyCode::Enter => SearchAction::Submit,
        KeyCode::Tab => SearchAction::Cycle,
        KeyCode::Char('q') | KeyCode::Char('c') if ctrl => SearchAction::Quit,
        KeyCode::Backspace => SearchAction::Edit(None),
        KeyCode::Char(c) if !ctrl => SearchAction::Edit(Some(c)),
        _ => SearchAction::Ignore,
    }
}

fn list_key(key_code: KeyCode) -> Option<ListKey> {
    match key_code {
        KeyCode::Up | KeyCode::Char('k') => Some(ListKey::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(ListKey::Down),
        KeyCode::Left => Some(ListKey::PreviousPage),
        KeyCode::Right => Some(ListKey::NextPage),
        KeyCode::Char('f') => Some(ListKey::FirstPage),
        KeyCode::Char('l') => Some(ListKey::LastPage),
        KeyCode::Enter => Some(ListKey::Commit),
        _ => None,
    }
}

/// Translate a key press for the currently focused pane
pub fn command_for_key(focused: Pane, key_code: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
    if focused == Pane::Search {
        return match handle_search_input(key_code, modifiers) {
            SearchAction::ClearAndExit => Some(Command::Cancel),
            SearchAction::Submit => Some(Command::SearchSubmit),
            SearchAction::Cycle => Some(Command::CycleFocus),
            SearchAction::Quit => Some(Command::Quit),
            SearchAction::Edit(Some(c)) => Some(Command::SearchInput(c)),
            SearchAction::Edit(None) => Some(Command::SearchBackspace),
            SearchAction::Ignore => None,
        };
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match key_code {
            KeyCode::Char('q') | KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    match key_code {
        KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Char('h') | KeyCode::Char('?') => Some(Command::ToggleHelp),
        KeyCode::Tab => Some(Command::CycleFocus),
        KeyCode::Esc => Some(Command::Cancel),
        KeyCode::Char('/') => Some(Command::FocusSearch),
        KeyCode::Char('r') => Some(Command::Refresh),
        KeyCode::Char('p') => Some(Command::Pull),
        other => list_key(other).map(Command::List),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_esc_clears() {
        assert_eq!(
            handle_search_input(KeyCode::Esc, KeyModifiers::NONE),
            SearchAction::ClearAndExit
        );
    }

    #[test]
    fn test_search_letters_are_input() {
        assert_eq!(
            command_for_key(Pane::Search, KeyCode::Char('q'), KeyModifiers::NONE),
            Some(Command::SearchInput('q'))
        );
        assert_eq!(
            command_for_key(Pane::Search, KeyCode::Char('h'), KeyModifiers::NONE),
            Some(Command::SearchInput('h'))
        );
        assert_eq!(
            command_for_key(Pane::Search, KeyCode::Backspace, KeyModifiers::NONE),
            Some(Command::SearchBackspace)
        );
    }

    #[test]
    fn test_search_ctrl_q_quits() {
        assert_eq!(
            command_for_key(Pane::Search, KeyCode::Char('q'), KeyModifiers::CONTROL),
            Some(Command::Quit)
        );
    }

    #[test]
    fn test_search_enter_submits() {
        assert_eq!(
            command_for_key(Pane::Search, KeyCode::Enter, KeyModifiers::NONE),
            Some(Command::SearchSubmit)
        );
    }

    #[test]
    fn test_global_bindings() {
        let cmd = |code| command_for_key(Pane::Repositories, code, KeyModifiers::NONE);
        assert_eq!(cmd(KeyCode::Char('q')), Some(Command::Quit));
        assert_eq!(cmd(KeyCode::Char('h')), Some(Command::ToggleHelp));
        assert_eq!(cmd(KeyCode::Tab), Some(Command::CycleFocus));
        assert_eq!(cmd(KeyCode::Esc), Some(Command::Cancel));
        assert_eq!(cmd(KeyCode::Char('/')), Some(Command::FocusSearch));
        assert_eq!(cmd(KeyCode::Char('r')), Some(Command::Refresh));
        assert_eq!(cmd(KeyCode::Char('p')), Some(Command::Pull));
    }

    #[test]
    fn test_list_bindings() {
        let cmd = |code| command_for_key(Pane::Tags, code, KeyModifiers::NONE);
        assert_eq!(cmd(KeyCode::Down), Some(Command::List(ListKey::Down)));
        assert_eq!(cmd(KeyCode::Char('j')), Some(Command::List(ListKey::Down)));
        assert_eq!(cmd(KeyCode::Char('k')), Some(Command::List(ListKey::Up)));
        assert_eq!(cmd(KeyCode::Left), Some(Command::List(ListKey::PreviousPage)));
        assert_eq!(cmd(KeyCode::Right), Some(Command::List(ListKey::NextPage)));
        assert_eq!(cmd(KeyCode::Char('f')), Some(Command::List(ListKey::FirstPage)));
        assert_eq!(cmd(KeyCode::Char('l')), Some(Command::List(ListKey::LastPage)));
        assert_eq!(cmd(KeyCode::Enter), Some(Command::List(ListKey::Commit)));
        assert_eq!(cmd(KeyCode::Char('z')), None);
    }
}
