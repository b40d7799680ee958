//! The contract between a paintbot and the game client driving it

use super::{
    action::CharacterAction,
    events::{
        CharacterStunnedEvent, GameEndedEvent, GameLinkEvent, GameResultEvent, GameStartingEvent,
        InvalidPlayerName, MapUpdateEvent, PlayerRegistered, TournamentEndedEvent,
    },
    settings::{GameMode, GameSettings},
};

/// Requests a paintbot may send to the game while handling a notification.
pub trait GameClient {
    /// Id assigned to this paintbot for the current session.
    fn player_id(&self) -> &str;

    fn register_for_game(&mut self, settings: GameSettings);

    /// Only honoured for training games, tournaments are started by the server.
    fn start_game(&mut self);

    /// Registers the action for `game_tick`. Moves tagged with any other
    /// tick are dropped by the game.
    fn register_move(&mut self, game_tick: u64, action: CharacterAction);
}

/// Public trait that paintbots need to implement, in order for the game
/// client to be able to interact with them.
///
/// The client is the only caller and invokes one method at a time, so an
/// implementation never sees two notifications concurrently.
pub trait PaintbotHandler: Send {
    /// Returns the paintbot's name
    fn name(&self) -> String;

    fn game_mode(&self) -> GameMode {
        GameMode::Training
    }

    /// The session is up, time to register for a game.
    fn on_connected(&mut self, client: &mut dyn GameClient);

    fn on_player_registered(&mut self, client: &mut dyn GameClient, event: &PlayerRegistered);

    /// This is the paintbot's turn to paint.
    fn on_map_update(&mut self, client: &mut dyn GameClient, event: &MapUpdateEvent);

    fn on_invalid_player_name(&mut self, _event: &InvalidPlayerName) {}

    fn on_game_starting(&mut self, _event: &GameStartingEvent) {}

    fn on_game_link(&mut self, _event: &GameLinkEvent) {}

    fn on_character_stunned(&mut self, _event: &CharacterStunnedEvent) {}

    fn on_game_ended(&mut self, _event: &GameEndedEvent) {}

    fn on_game_result(&mut self, _event: &GameResultEvent) {}

    fn on_tournament_ended(&mut self, _event: &TournamentEndedEvent) {}

    fn on_session_closed(&mut self) {}
}
