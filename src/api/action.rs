use serde::{Deserialize, Serialize};

/// Every action a paintbot character can register for a game tick.
#[derive(
    Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CharacterAction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    Stay,
    Explode,
}

impl CharacterAction {
    /// The four movements, in the order the bot enumerates them.
    pub const MOVEMENTS: [CharacterAction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn is_movement(&self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Offset applied to a coordinate when performing this action.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Stay | Self::Explode => (0, 0),
        }
    }
}

impl std::fmt::Display for CharacterAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Stay => "STAY",
            Self::Explode => "EXPLODE",
        };
        write!(f, "{text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movements_are_exactly_the_four_directions() {
        assert!(CharacterAction::MOVEMENTS.iter().all(|a| a.is_movement()));
        assert!(!CharacterAction::Stay.is_movement());
        assert!(!CharacterAction::Explode.is_movement());
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&CharacterAction::Explode).unwrap();
        assert_eq!("\"EXPLODE\"", json);

        let parsed: CharacterAction = serde_json::from_str("\"LEFT\"").unwrap();
        assert_eq!(CharacterAction::Left, parsed);
    }
}
