use rand::Rng;

use crate::api::settings::{GameMode, GameSettings};

pub const DEFAULT_SERVER_HOST: &str = "localhost";
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Everything that personalises a paintbot run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotConfig {
    pub server_host: String,
    pub server_port: u16,
    pub game_mode: GameMode,
    pub bot_name: String,
    /// Set to false to start the game from somewhere else
    pub auto_start_game: bool,
    /// Print the game world every tick
    pub ansi_printer_active: bool,
}

impl BotConfig {
    /// Settings sent along with the game registration.
    pub fn game_settings(&self) -> GameSettings {
        match self.game_mode {
            GameMode::Training => GameSettings::training_world(),
            GameMode::Tournament => GameSettings::tournament_world(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            game_mode: GameMode::Training,
            bot_name: default_bot_name(),
            auto_start_game: true,
            ansi_printer_active: false,
        }
    }
}

pub fn default_bot_name() -> String {
    format!("The Simple Painter {}", rand::rng().random_range(0..1000))
}
