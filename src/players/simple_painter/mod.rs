pub mod strategy;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::{
    api::{
        action::CharacterAction,
        client::{GameClient, PaintbotHandler},
        events::{
            CharacterStunnedEvent, GameEndedEvent, GameLinkEvent, GameResultEvent,
            GameStartingEvent, InvalidPlayerName, MapUpdateEvent, PlayerRegistered,
            TournamentEndedEvent,
        },
        map_utility::MapUtility,
        settings::GameMode,
    },
    config::BotConfig,
    printer::AnsiPrinter,
};

use strategy::BotState;

/// Chases power-ups, paints fresh tiles and blows up whatever it carries
/// once the coast is clear.
pub struct SimplePainter {
    config: BotConfig,
    printer: AnsiPrinter,
    rng: StdRng,
    state: BotState,
}

impl SimplePainter {
    pub fn new(config: BotConfig) -> Self {
        Self::with_seed(config, rand::rng().random())
    }

    /// Same as `new`, with every random tie-break pinned by `seed`.
    pub fn with_seed(config: BotConfig, seed: u64) -> Self {
        let printer = AnsiPrinter::new(config.ansi_printer_active, true);

        Self {
            config,
            printer,
            rng: StdRng::seed_from_u64(seed),
            state: BotState::default(),
        }
    }

    pub fn state(&self) -> &BotState {
        &self.state
    }
}

impl PaintbotHandler for SimplePainter {
    fn name(&self) -> String {
        self.config.bot_name.clone()
    }

    fn game_mode(&self) -> GameMode {
        self.config.game_mode
    }

    fn on_connected(&mut self, client: &mut dyn GameClient) {
        info!("Connected, registering for {}...", self.config.game_mode);
        client.register_for_game(self.config.game_settings());
    }

    fn on_player_registered(&mut self, client: &mut dyn GameClient, event: &PlayerRegistered) {
        info!("PlayerRegistered: {event}");

        if self.config.auto_start_game {
            client.start_game();
        }
    }

    fn on_map_update(&mut self, client: &mut dyn GameClient, event: &MapUpdateEvent) {
        self.printer.print_map(event);

        let Some(map_util) = MapUtility::new(&event.map, client.player_id()) else {
            warn!(
                tick = event.game_tick,
                "own character missing from the map, staying put"
            );
            client.register_move(event.game_tick, CharacterAction::Stay);
            return;
        };

        let action =
            strategy::choose_action(&map_util, event.game_tick, &mut self.state, &mut self.rng);
        debug!(tick = event.game_tick, %action, "registering move");

        client.register_move(event.game_tick, action);
    }

    fn on_invalid_player_name(&mut self, event: &InvalidPlayerName) {
        warn!("InvalidPlayerName: {:?}", event.reason_code);
    }

    fn on_game_starting(&mut self, event: &GameStartingEvent) {
        debug!("GameStartingEvent: {event:?}");
        // ticks restart with every game
        self.state = BotState::default();
    }

    fn on_game_link(&mut self, event: &GameLinkEvent) {
        info!("The game can be viewed at: {}", event.url);
    }

    fn on_character_stunned(&mut self, event: &CharacterStunnedEvent) {
        // Stunned by crashing or getting caught in an explosion, not dead
        debug!(
            tick = event.game_tick,
            "stunned for {} ticks", event.duration_in_ticks
        );
    }

    fn on_game_ended(&mut self, event: &GameEndedEvent) {
        debug!(
            "GameEndedEvent: game {} ended at tick {}, winner {}",
            event.game_id, event.game_tick, event.player_winner_id
        );
        if let Some(me) = event
            .map
            .character_infos
            .iter()
            .find(|character| character.name == self.config.bot_name)
        {
            info!(
                "Finished with {} tiles painted and {} points",
                me.coloured_positions.len(),
                me.points
            );
        }
    }

    fn on_game_result(&mut self, event: &GameResultEvent) {
        info!("Game result:");
        for rank in &event.player_ranks {
            info!("{rank}");
        }
    }

    fn on_tournament_ended(&mut self, event: &TournamentEndedEvent) {
        info!(
            "Tournament has ended, winner playerId: {}",
            event.player_winner_id
        );
        for (place, points) in event.game_result.iter().enumerate() {
            info!("{}. {} - {} points", place + 1, points.name, points.points);
        }
    }

    fn on_session_closed(&mut self) {
        info!("Session closed");
    }
}
