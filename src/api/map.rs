use serde::{Deserialize, Serialize};

use super::coordinate::MapCoordinate;

pub type PlayerId = String;

/// The state of a single character as seen in a map snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterInfo {
    pub name: String,
    pub id: PlayerId,
    pub points: i32,
    pub position: i32,
    pub coloured_positions: Vec<i32>,
    pub stunned_for_game_ticks: i32,
    pub carrying_power_up: bool,
}

impl CharacterInfo {
    pub fn is_stunned(&self) -> bool {
        self.stunned_for_game_ticks > 0
    }
}

/// Snapshot of the whole game world for one tick. Positions are flat
/// indices, see [`MapCoordinate::from_position`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Map {
    pub width: i32,
    pub height: i32,
    pub world_tick: u64,
    pub character_infos: Vec<CharacterInfo>,
    pub obstacle_positions: Vec<i32>,
    pub power_up_positions: Vec<i32>,
}

impl Map {
    pub fn character(&self, player_id: &str) -> Option<&CharacterInfo> {
        self.character_infos.iter().find(|c| c.id == player_id)
    }

    pub fn coordinate_of(&self, position: i32) -> MapCoordinate {
        MapCoordinate::from_position(position, self.width)
    }

    pub fn position_of(&self, coordinate: &MapCoordinate) -> i32 {
        coordinate.to_position(self.width)
    }
}
