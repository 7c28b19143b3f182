//! Terminal-agnostic key events and the default bindings.

/// A key press as seen by the navigation core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
}

/// Navigation-level actions handled by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Forward,
    Back,
    Reload,
    Spec,
    Filter,
    Save,
    StdOut,
    StdErr,
    /// `q`: exits unless a text prompt is capturing input.
    Exit,
    /// `ctrl+c`: always exits.
    ForceExit,
}

/// Scroll and cursor movement inside a viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportAction {
    LineUp,
    LineDown,
    HalfPageUp,
    HalfPageDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    Left,
    Right,
}

pub fn action_for(key: Key) -> Option<Action> {
    match key {
        Key::Enter => Some(Action::Forward),
        Key::Esc => Some(Action::Back),
        Key::Char('r') => Some(Action::Reload),
        Key::Char('s') => Some(Action::Spec),
        Key::Char('/') => Some(Action::Filter),
        Key::Ctrl('s') => Some(Action::Save),
        Key::Char('o') => Some(Action::StdOut),
        Key::Char('e') => Some(Action::StdErr),
        Key::Char('q') => Some(Action::Exit),
        Key::Ctrl('c') => Some(Action::ForceExit),
        _ => None,
    }
}

pub fn viewport_action_for(key: Key) -> Option<ViewportAction> {
    match key {
        Key::Up | Key::Char('k') => Some(ViewportAction::LineUp),
        Key::Down | Key::Char('j') => Some(ViewportAction::LineDown),
        Key::Ctrl('u') => Some(ViewportAction::HalfPageUp),
        Key::Ctrl('d') => Some(ViewportAction::HalfPageDown),
        Key::PageUp | Key::Char('b') => Some(ViewportAction::PageUp),
        Key::PageDown | Key::Char('f') | Key::Char(' ') => Some(ViewportAction::PageDown),
        Key::Home | Key::Char('g') => Some(ViewportAction::Top),
        Key::End | Key::Char('G') => Some(ViewportAction::Bottom),
        Key::Left | Key::Char('h') => Some(ViewportAction::Left),
        Key::Right | Key::Char('l') => Some(ViewportAction::Right),
        _ => None,
    }
}
