use std::collections::HashSet;

use super::{
    action::CharacterAction,
    coordinate::MapCoordinate,
    map::{CharacterInfo, Map},
};

/// MapQuery is the set of coordinate level questions a bot may ask about
/// the snapshot of the current tick.
pub trait MapQuery {
    /// Id of the player this view was built for.
    fn my_player_id(&self) -> &str;

    fn my_coordinate(&self) -> MapCoordinate;

    fn is_carrying_power_up(&self) -> bool;

    /// Whether performing `action` this tick would not run into a wall,
    /// an obstacle or another character.
    fn can_i_move_in_direction(&self, action: CharacterAction) -> bool;

    fn is_coordinate_out_of_bounds(&self, coordinate: &MapCoordinate) -> bool;

    fn coordinates_containing_power_ups(&self) -> Vec<MapCoordinate>;

    fn player_coloured_coordinates(&self, player_id: &str) -> Vec<MapCoordinate>;

    fn my_coloured_coordinates(&self) -> Vec<MapCoordinate> {
        self.player_coloured_coordinates(self.my_player_id())
    }
}

/// [`MapQuery`] implementation on top of a [`Map`] snapshot.
pub struct MapUtility<'a> {
    map: &'a Map,
    me: &'a CharacterInfo,
    obstacles: HashSet<i32>,
    occupied: HashSet<i32>,
}

impl<'a> MapUtility<'a> {
    /// Returns `None` when `player_id` has no character on the map.
    pub fn new(map: &'a Map, player_id: &str) -> Option<Self> {
        let me = map.character(player_id)?;

        Some(Self {
            map,
            me,
            obstacles: map.obstacle_positions.iter().copied().collect(),
            occupied: map
                .character_infos
                .iter()
                .filter(|c| c.id != me.id)
                .map(|c| c.position)
                .collect(),
        })
    }

    pub fn is_tile_available_for_movement_to(&self, coordinate: &MapCoordinate) -> bool {
        if self.is_coordinate_out_of_bounds(coordinate) {
            return false;
        }

        let position = self.map.position_of(coordinate);
        !self.obstacles.contains(&position) && !self.occupied.contains(&position)
    }
}

impl MapQuery for MapUtility<'_> {
    fn my_player_id(&self) -> &str {
        &self.me.id
    }

    fn my_coordinate(&self) -> MapCoordinate {
        self.map.coordinate_of(self.me.position)
    }

    fn is_carrying_power_up(&self) -> bool {
        self.me.carrying_power_up
    }

    fn can_i_move_in_direction(&self, action: CharacterAction) -> bool {
        match action {
            CharacterAction::Stay => true,
            CharacterAction::Explode => self.me.carrying_power_up,
            movement => {
                let target = self.my_coordinate().translate_by_action(movement);
                self.is_tile_available_for_movement_to(&target)
            }
        }
    }

    fn is_coordinate_out_of_bounds(&self, coordinate: &MapCoordinate) -> bool {
        coordinate.is_out_of_bounds(self.map.width, self.map.height)
    }

    fn coordinates_containing_power_ups(&self) -> Vec<MapCoordinate> {
        let mut positions = self.map.power_up_positions.clone();
        positions.sort_unstable();

        positions
            .into_iter()
            .map(|p| self.map.coordinate_of(p))
            .collect()
    }

    fn player_coloured_coordinates(&self, player_id: &str) -> Vec<MapCoordinate> {
        self.map
            .character(player_id)
            .map(|c| {
                c.coloured_positions
                    .iter()
                    .map(|p| self.map.coordinate_of(*p))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character(id: &str, position: i32) -> CharacterInfo {
        CharacterInfo {
            name: id.to_string(),
            id: id.to_string(),
            position,
            ..CharacterInfo::default()
        }
    }

    // 5x5 map, me in the middle (2,2), an obstacle to the right and
    // another character below
    fn sample_map() -> Map {
        Map {
            width: 5,
            height: 5,
            world_tick: 1,
            character_infos: vec![character("me", 12), character("other", 17)],
            obstacle_positions: vec![13],
            power_up_positions: vec![24, 0],
        }
    }

    #[test]
    fn test_unknown_player_has_no_view() {
        let map = sample_map();

        assert!(MapUtility::new(&map, "nobody").is_none());
    }

    #[test]
    fn test_movement_legality() {
        let map = sample_map();
        let util = MapUtility::new(&map, "me").unwrap();

        assert_eq!(MapCoordinate::new(2, 2), util.my_coordinate());
        assert!(util.can_i_move_in_direction(CharacterAction::Up));
        assert!(util.can_i_move_in_direction(CharacterAction::Left));
        assert!(!util.can_i_move_in_direction(CharacterAction::Right));
        assert!(!util.can_i_move_in_direction(CharacterAction::Down));
        assert!(util.can_i_move_in_direction(CharacterAction::Stay));
        assert!(!util.can_i_move_in_direction(CharacterAction::Explode));
    }

    #[test]
    fn test_edges_block_movement() {
        let map = Map {
            width: 3,
            height: 3,
            character_infos: vec![character("me", 0)],
            ..Map::default()
        };
        let util = MapUtility::new(&map, "me").unwrap();

        assert!(!util.can_i_move_in_direction(CharacterAction::Up));
        assert!(!util.can_i_move_in_direction(CharacterAction::Left));
        assert!(util.can_i_move_in_direction(CharacterAction::Down));
        assert!(util.can_i_move_in_direction(CharacterAction::Right));
    }

    #[test]
    fn test_power_ups_are_listed_in_position_order() {
        let map = sample_map();
        let util = MapUtility::new(&map, "me").unwrap();

        assert_eq!(
            vec![MapCoordinate::new(0, 0), MapCoordinate::new(4, 4)],
            util.coordinates_containing_power_ups()
        );
    }

    #[test]
    fn test_coloured_coordinates() {
        let mut map = sample_map();
        map.character_infos[0].coloured_positions = vec![7, 12];
        let util = MapUtility::new(&map, "me").unwrap();

        assert_eq!(
            vec![MapCoordinate::new(2, 1), MapCoordinate::new(2, 2)],
            util.my_coloured_coordinates()
        );
        assert!(util.player_coloured_coordinates("other").is_empty());
        assert!(util.player_coloured_coordinates("ghost").is_empty());
    }
}
