use super::action::CharacterAction;

/// A tile on the game map. `x` grows to the right and `y` grows downwards,
/// so `Up` decreases `y`.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct MapCoordinate {
    pub x: i32,
    pub y: i32,
}

impl MapCoordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Computes the manhattan distance between `self` and the provided coordinate
    ///
    /// The distance is the number of horizontal and vertical steps it takes
    /// to walk from one tile to the other, ignoring anything in between.
    pub fn manhattan_distance(&self, other: &MapCoordinate) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The coordinate reached by performing `action` from here. Bounds are
    /// not checked.
    pub fn translate_by_action(&self, action: CharacterAction) -> Self {
        let (dx, dy) = action.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn is_out_of_bounds(&self, width: i32, height: i32) -> bool {
        self.x < 0 || self.y < 0 || self.x >= width || self.y >= height
    }

    /// Converts a flat map position into a coordinate.
    pub fn from_position(position: i32, width: i32) -> Self {
        Self {
            x: position % width,
            y: position / width,
        }
    }

    /// Converts this coordinate into a flat map position.
    pub fn to_position(&self, width: i32) -> i32 {
        self.x + self.y * width
    }
}

impl std::fmt::Display for MapCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[x:{:02}, y:{:02}]", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan_distance() {
        let a = MapCoordinate::new(2, 3);
        let b = MapCoordinate::new(5, 7);

        assert_eq!(7, a.manhattan_distance(&b));
        assert_eq!(7, b.manhattan_distance(&a));
    }

    #[test]
    fn test_translate_up_decreases_y() {
        let start = MapCoordinate::new(5, 5);

        assert_eq!(MapCoordinate::new(5, 4), start.translate_by_action(CharacterAction::Up));
        assert_eq!(MapCoordinate::new(6, 5), start.translate_by_action(CharacterAction::Right));
        assert_eq!(start, start.translate_by_action(CharacterAction::Explode));
    }

    #[test]
    fn test_position_conversion() {
        let coordinate = MapCoordinate::from_position(47, 46);

        assert_eq!(MapCoordinate::new(1, 1), coordinate);
        assert_eq!(47, coordinate.to_position(46));
    }

    #[test]
    fn test_bounds() {
        assert!(MapCoordinate::new(-1, 0).is_out_of_bounds(10, 10));
        assert!(MapCoordinate::new(0, 10).is_out_of_bounds(10, 10));
        assert!(!MapCoordinate::new(9, 9).is_out_of_bounds(10, 10));
    }
}
