//! Notifications delivered by the game client to a paintbot.

use serde::{Deserialize, Serialize};

use super::{
    map::{Map, PlayerId},
    settings::{GameMode, GameSettings},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapUpdateEvent {
    pub game_tick: u64,
    pub game_id: String,
    pub receiving_player_id: PlayerId,
    pub map: Map,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRegistered {
    pub game_id: String,
    pub name: String,
    pub game_settings: GameSettings,
    pub game_mode: GameMode,
}

impl std::fmt::Display for PlayerRegistered {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{name: {}, game_id: {}, mode: {}}}",
            self.name, self.game_id, self.game_mode
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerNameInvalidReason {
    Taken,
    Empty,
    TooLong,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidPlayerName {
    pub reason_code: PlayerNameInvalidReason,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStartingEvent {
    pub game_id: String,
    pub noof_players: u32,
    pub width: i32,
    pub height: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameLinkEvent {
    pub game_id: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterStunnedEvent {
    pub player_id: PlayerId,
    pub game_tick: u64,
    pub duration_in_ticks: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEndedEvent {
    pub game_id: String,
    pub game_tick: u64,
    pub player_winner_id: PlayerId,
    pub map: Map,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRank {
    pub player_name: String,
    pub player_id: PlayerId,
    pub rank: u32,
    pub points: i32,
}

impl std::fmt::Display for PlayerRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:>2}. {} ({}) - {} points",
            self.rank, self.player_name, self.player_id, self.points
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResultEvent {
    pub game_id: String,
    pub player_ranks: Vec<PlayerRank>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPoints {
    pub name: String,
    pub player_id: PlayerId,
    pub points: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentEndedEvent {
    pub tournament_name: String,
    pub player_winner_id: PlayerId,
    pub game_result: Vec<PlayerPoints>,
}
