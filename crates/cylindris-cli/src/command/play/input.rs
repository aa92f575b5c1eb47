use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode};
use cylindris_engine::{Command, ModeKind};

/// What a single key press asks the shell to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyAction {
    Command(Command),
    SwitchMode(ModeKind),
    Restart,
    TogglePause,
    Quit,
}

impl KeyAction {
    pub(crate) fn from_key(key: KeyEvent) -> Option<Self> {
        let action = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Self::Quit,
            KeyCode::Left => Self::Command(Command::MoveLeft),
            KeyCode::Right => Self::Command(Command::MoveRight),
            KeyCode::Down | KeyCode::Char(' ') => Self::Command(Command::MoveDown),
            KeyCode::Up | KeyCode::Char('x' | 'X') => Self::Command(Command::RotateCw),
            KeyCode::Char('z' | 'Z') | KeyCode::Modifier(ModifierKeyCode::LeftControl) => {
                Self::Command(Command::RotateCcw)
            }
            KeyCode::Char('1') => Self::SwitchMode(ModeKind::Classic),
            KeyCode::Char('2') => Self::SwitchMode(ModeKind::Cylinder),
            KeyCode::Char('r' | 'R') => Self::Restart,
            KeyCode::Char('p' | 'P') => Self::TogglePause,
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => Self::Quit,
            _ => return None,
        };
        Some(action)
    }

    pub(crate) fn command(self) -> Option<Command> {
        match self {
            Self::Command(command) => Some(command),
            _ => None,
        }
    }
}
