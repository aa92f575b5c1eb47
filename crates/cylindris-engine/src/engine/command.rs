use crate::core::Point;

/// Player input for a single frame.
///
/// [`Command::Jammed`] marks a frame where conflicting inputs arrived
/// together; it is accepted like any other command but has no effect.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Command {
    #[default]
    None,
    MoveLeft,
    MoveRight,
    MoveDown,
    RotateCw,
    RotateCcw,
    Jammed,
}

impl Command {
    /// Commands that act on the falling piece.
    pub const ACTIONS: [Command; 5] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::MoveDown,
        Command::RotateCw,
        Command::RotateCcw,
    ];

    /// Resolves every command pressed during one frame into a single command.
    ///
    /// No input gives [`Command::None`], a single distinct command is returned
    /// as is, and two or more distinct commands give [`Command::Jammed`].
    ///
    /// # Example
    ///
    /// ```
    /// use cylindris_engine::Command;
    ///
    /// assert_eq!(Command::from_pressed([]), Command::None);
    /// assert_eq!(Command::from_pressed([Command::MoveLeft]), Command::MoveLeft);
    /// assert_eq!(
    ///     Command::from_pressed([Command::MoveLeft, Command::RotateCw]),
    ///     Command::Jammed,
    /// );
    /// ```
    pub fn from_pressed<I>(pressed: I) -> Self
    where
        I: IntoIterator<Item = Command>,
    {
        let mut resolved = Command::None;
        for command in pressed {
            if command.is_none() || command == resolved {
                continue;
            }
            if !resolved.is_none() {
                return Command::Jammed;
            }
            resolved = command;
        }
        resolved
    }

    /// Translation requested by this command, if it is a move.
    #[must_use]
    pub const fn offset(self) -> Option<Point> {
        match self {
            Command::MoveLeft => Some(Point::LEFT),
            Command::MoveRight => Some(Point::RIGHT),
            Command::MoveDown => Some(Point::DOWN),
            _ => None,
        }
    }

    /// Rotation requested by this command, if it is a rotation.
    #[must_use]
    pub const fn rotation(self) -> Option<Rotation> {
        match self {
            Command::RotateCw => Some(Rotation::Clockwise),
            Command::RotateCcw => Some(Rotation::CounterClockwise),
            _ => None,
        }
    }
}

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}
