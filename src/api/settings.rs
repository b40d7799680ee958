use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    #[default]
    Training,
    Tournament,
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Training => write!(f, "TRAINING"),
            Self::Tournament => write!(f, "TOURNAMENT"),
        }
    }
}

/// Rules of a single game. Likelihoods are expressed in percent per tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub max_noof_players: u32,
    pub time_in_ms_per_tick: u64,
    pub obstacles_enabled: bool,
    pub power_ups_enabled: bool,
    pub add_power_up_likelihood: u32,
    pub remove_power_up_likelihood: u32,
    pub game_duration_in_seconds: u64,
    pub explosion_range: u32,
    pub points_per_tile_owned: i32,
    pub points_per_caused_stun: i32,
    pub no_of_ticks_invulnerable_after_stun: u32,
    pub no_of_ticks_stunned: u32,
    pub start_obstacles: u32,
    pub start_power_ups: u32,
    pub min_no_of_powerups: u32,
    pub training_game: bool,
}

impl GameSettings {
    /// Settings used when registering for a training game.
    pub fn training_world() -> Self {
        Self {
            max_noof_players: 5,
            time_in_ms_per_tick: 250,
            obstacles_enabled: true,
            power_ups_enabled: true,
            add_power_up_likelihood: 38,
            remove_power_up_likelihood: 5,
            game_duration_in_seconds: 15,
            explosion_range: 4,
            points_per_tile_owned: 1,
            points_per_caused_stun: 5,
            no_of_ticks_invulnerable_after_stun: 3,
            no_of_ticks_stunned: 10,
            start_obstacles: 40,
            start_power_ups: 41,
            min_no_of_powerups: 5,
            training_game: true,
        }
    }

    /// Settings the arena uses for tournament rounds.
    pub fn tournament_world() -> Self {
        Self {
            game_duration_in_seconds: 30,
            training_game: false,
            ..Self::training_world()
        }
    }

    pub fn duration_in_ticks(&self) -> u64 {
        if self.time_in_ms_per_tick == 0 {
            return 0;
        }

        self.game_duration_in_seconds * 1000 / self.time_in_ms_per_tick
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::training_world()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_world_duration() {
        let settings = GameSettings::training_world();

        assert!(settings.training_game);
        assert_eq!(60, settings.duration_in_ticks());
    }

    #[test]
    fn test_zero_tick_length_yields_no_ticks() {
        let settings = GameSettings {
            time_in_ms_per_tick: 0,
            ..GameSettings::default()
        };

        assert_eq!(0, settings.duration_in_ticks());
    }
}
