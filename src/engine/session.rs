use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::{
    api::{
        action::CharacterAction,
        client::{GameClient, PaintbotHandler},
        events::{
            CharacterStunnedEvent, GameEndedEvent, GameLinkEvent, GameResultEvent,
            GameStartingEvent, InvalidPlayerName, MapUpdateEvent, PlayerNameInvalidReason,
            PlayerPoints, PlayerRegistered, TournamentEndedEvent,
        },
        settings::{GameMode, GameSettings},
    },
    config::{DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT},
    engine::{arena::Arena, opponent::Wanderer},
    error::ClientError,
};

pub const LOCAL_PLAYER_ID: &str = "local-painter";
pub const MAX_NAME_LENGTH: usize = 32;
pub const DEFAULT_OPPONENTS: u32 = 3;
pub const DEFAULT_TOURNAMENT_ROUNDS: u32 = 3;

const MIN_WORLD_SIDE: i32 = 3;

/// How the local training arena is laid out and paced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    pub width: i32,
    pub height: i32,
    pub opponents: u32,
    pub tournament_rounds: u32,
    pub seed: Option<u64>,
    /// Sleep for the tick length of the game between two ticks
    pub realtime: bool,
    pub server_host: String,
    pub server_port: u16,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 46,
            height: 34,
            opponents: DEFAULT_OPPONENTS,
            tournament_rounds: DEFAULT_TOURNAMENT_ROUNDS,
            seed: None,
            realtime: false,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}

impl ArenaConfig {
    fn validate(&self, mode: GameMode, settings: &GameSettings) -> Result<(), ClientError> {
        let players = self.opponents + 1;
        if players > settings.max_noof_players {
            return Err(ClientError::TooManyPlayers {
                requested: players,
                max: settings.max_noof_players,
            });
        }

        let needed = players as i64
            + settings.start_obstacles as i64 * settings.obstacles_enabled as i64
            + settings.start_power_ups as i64 * settings.power_ups_enabled as i64;
        if self.width < MIN_WORLD_SIDE
            || self.height < MIN_WORLD_SIDE
            || (self.width as i64 * self.height as i64) <= needed
        {
            return Err(ClientError::WorldTooSmall {
                width: self.width,
                height: self.height,
            });
        }

        if settings.duration_in_ticks() == 0 {
            return Err(ClientError::NoTicksPerGame);
        }

        if mode == GameMode::Tournament && self.tournament_rounds == 0 {
            return Err(ClientError::NoTournamentRounds);
        }

        Ok(())
    }

    fn game_link(&self, game_id: &str) -> String {
        format!(
            "http://{}:{}/game/{game_id}",
            self.server_host, self.server_port
        )
    }
}

/// Everything the session saw, handed back once it is over.
pub struct SessionOutcome<H> {
    pub handler: H,
    pub game_results: Vec<GameResultEvent>,
    pub tournament: Option<TournamentEndedEvent>,
}

/// Shareable view on whether a session is still playing.
#[derive(Clone, Debug)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn is_playing(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Polls the flag every `interval` on a thread of its own and returns
    /// once the session stopped playing.
    pub fn spawn_monitor(&self, interval: Duration) -> std::io::Result<JoinHandle<()>> {
        let liveness = self.clone();

        thread::Builder::new()
            .name("paintbot-monitor".to_string())
            .spawn(move || {
                while liveness.is_playing() {
                    thread::sleep(interval);
                }
                info!("Shutting down");
            })
    }
}

/// Clears the liveness flag when the session thread ends, even by panic.
struct PlayingGuard(Arc<AtomicBool>);

impl Drop for PlayingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A game session against the in-process training arena.
///
/// All notifications are delivered on a single session thread, one at a
/// time, in the order a game server would send them.
pub struct LocalSession<H> {
    playing: Arc<AtomicBool>,
    handle: JoinHandle<SessionOutcome<H>>,
}

impl<H: PaintbotHandler + 'static> LocalSession<H> {
    pub fn connect(config: ArenaConfig, handler: H) -> Result<Self, ClientError> {
        let mode = handler.game_mode();
        config.validate(mode, &default_settings(mode))?;

        let playing = Arc::new(AtomicBool::new(true));
        let guard = PlayingGuard(playing.clone());

        let handle = thread::Builder::new()
            .name("paintbot-session".to_string())
            .spawn(move || {
                let _guard = guard;
                run_session(config, handler)
            })
            .map_err(|err| ClientError::SessionSpawn {
                reason: err.to_string(),
            })?;

        Ok(Self { playing, handle })
    }

    pub fn liveness(&self) -> Liveness {
        Liveness(self.playing.clone())
    }

    pub fn join(self) -> Result<SessionOutcome<H>, ClientError> {
        self.handle.join().map_err(|_| ClientError::SessionPanicked)
    }
}

fn default_settings(mode: GameMode) -> GameSettings {
    match mode {
        GameMode::Training => GameSettings::training_world(),
        GameMode::Tournament => GameSettings::tournament_world(),
    }
}

/// The client side handed to the paintbot during every notification.
struct LocalClient {
    player_id: String,
    registration: Option<GameSettings>,
    start_requested: bool,
    moves: Vec<(u64, CharacterAction)>,
}

impl LocalClient {
    fn new() -> Self {
        Self {
            player_id: LOCAL_PLAYER_ID.to_string(),
            registration: None,
            start_requested: false,
            moves: Vec::new(),
        }
    }

    /// The first move registered for `game_tick`, anything else is dropped.
    fn take_move(&mut self, game_tick: u64) -> CharacterAction {
        let mut chosen = None;

        for (tick, action) in self.moves.drain(..) {
            if tick != game_tick {
                debug!(tick, game_tick, "dropping move registered for another tick");
            } else if chosen.is_none() {
                chosen = Some(action);
            } else {
                debug!(tick, "dropping extra move");
            }
        }

        chosen.unwrap_or_else(|| {
            debug!(game_tick, "no move registered, staying");
            CharacterAction::Stay
        })
    }
}

impl GameClient for LocalClient {
    fn player_id(&self) -> &str {
        &self.player_id
    }

    fn register_for_game(&mut self, settings: GameSettings) {
        self.registration = Some(settings);
    }

    fn start_game(&mut self) {
        self.start_requested = true;
    }

    fn register_move(&mut self, game_tick: u64, action: CharacterAction) {
        self.moves.push((game_tick, action));
    }
}

fn validate_name(name: &str, opponents: &[Wanderer]) -> Option<PlayerNameInvalidReason> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        Some(PlayerNameInvalidReason::Empty)
    } else if trimmed.chars().count() > MAX_NAME_LENGTH {
        Some(PlayerNameInvalidReason::TooLong)
    } else if opponents.iter().any(|o| o.name() == trimmed) {
        Some(PlayerNameInvalidReason::Taken)
    } else {
        None
    }
}

fn run_session<H: PaintbotHandler>(config: ArenaConfig, mut handler: H) -> SessionOutcome<H> {
    let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(|| rand::rng().random()));
    let mut client = LocalClient::new();
    let mut game_results = Vec::new();
    let mut tournament = None;

    handler.on_connected(&mut client);

    if let Some(settings) = client.registration.take() {
        let mode = handler.game_mode();
        let name = handler.name();
        let mut opponents: Vec<Wanderer> = (1..=config.opponents as usize)
            .map(Wanderer::new)
            .collect();

        if let Err(err) = config.validate(mode, &settings) {
            warn!("registration refused: {err}");
        } else if let Some(reason_code) = validate_name(&name, &opponents) {
            handler.on_invalid_player_name(&InvalidPlayerName { reason_code });
        } else {
            let game_id = format!("{}-{:08x}", mode, rng.random::<u32>()).to_lowercase();
            let registered = PlayerRegistered {
                game_id: game_id.clone(),
                name,
                game_settings: settings.clone(),
                game_mode: mode,
            };
            handler.on_player_registered(&mut client, &registered);

            match mode {
                GameMode::Training if client.start_requested => {
                    let result = play_game(
                        &config,
                        &settings,
                        &game_id,
                        &mut handler,
                        &mut client,
                        &mut opponents,
                        &mut rng,
                    );
                    game_results.push(result);
                }
                GameMode::Training => {
                    warn!("training game {game_id} was never started");
                }
                GameMode::Tournament => {
                    for round in 1..=config.tournament_rounds {
                        let round_id = format!("{game_id}-{round}");
                        let result = play_game(
                            &config,
                            &settings,
                            &round_id,
                            &mut handler,
                            &mut client,
                            &mut opponents,
                            &mut rng,
                        );
                        game_results.push(result);
                    }

                    let ended = tournament_result(&game_id, &game_results);
                    handler.on_tournament_ended(&ended);
                    tournament = Some(ended);
                }
            }
        }
    } else {
        warn!("paintbot never registered for a game");
    }

    handler.on_session_closed();

    SessionOutcome {
        handler,
        game_results,
        tournament,
    }
}

fn play_game<H: PaintbotHandler, R: Rng>(
    config: &ArenaConfig,
    settings: &GameSettings,
    game_id: &str,
    handler: &mut H,
    client: &mut LocalClient,
    opponents: &mut [Wanderer],
    rng: &mut R,
) -> GameResultEvent {
    let mut arena = Arena::new(settings.clone(), config.width, config.height, rng.random());

    let mut seats = Vec::new();
    if let Some(index) = arena.spawn_character(LOCAL_PLAYER_ID, &handler.name()) {
        seats.push((index, None));
    }
    for (seat, opponent) in opponents.iter().enumerate() {
        if let Some(index) = arena.spawn_character(opponent.id(), opponent.name()) {
            seats.push((index, Some(seat)));
        }
    }

    info!("game {game_id} starting with {} players", seats.len());
    handler.on_game_starting(&GameStartingEvent {
        game_id: game_id.to_string(),
        noof_players: seats.len() as u32,
        width: config.width,
        height: config.height,
    });
    handler.on_game_link(&GameLinkEvent {
        game_id: game_id.to_string(),
        url: config.game_link(game_id),
    });

    while !arena.is_over() {
        let game_tick = arena.tick();
        let map = arena.snapshot();

        let mut actions = Vec::with_capacity(seats.len());
        for (index, seat) in &seats {
            let action = match seat {
                Some(seat) => opponents[*seat].act(&map, rng),
                None => {
                    let event = MapUpdateEvent {
                        game_tick,
                        game_id: game_id.to_string(),
                        receiving_player_id: LOCAL_PLAYER_ID.to_string(),
                        map: map.clone(),
                    };
                    handler.on_map_update(client, &event);
                    client.take_move(game_tick)
                }
            };
            actions.push((*index, action));
        }

        for stun in arena.resolve_tick(actions) {
            if stun.player_id == LOCAL_PLAYER_ID {
                handler.on_character_stunned(&CharacterStunnedEvent {
                    player_id: stun.player_id,
                    game_tick,
                    duration_in_ticks: stun.duration_in_ticks,
                });
            }
        }

        if config.realtime {
            thread::sleep(Duration::from_millis(settings.time_in_ms_per_tick));
        }
    }

    debug!("final world of game {game_id}:\n{arena}");

    let player_ranks = arena.ranks();
    let player_winner_id = player_ranks
        .first()
        .map(|rank| rank.player_id.clone())
        .unwrap_or_default();

    handler.on_game_ended(&GameEndedEvent {
        game_id: game_id.to_string(),
        game_tick: arena.tick(),
        player_winner_id,
        map: arena.snapshot(),
    });

    let result = GameResultEvent {
        game_id: game_id.to_string(),
        player_ranks,
    };
    handler.on_game_result(&result);

    result
}

/// Sums up the points of every round, best first.
fn tournament_result(tournament_name: &str, games: &[GameResultEvent]) -> TournamentEndedEvent {
    let mut totals: HashMap<String, PlayerPoints> = HashMap::new();

    for rank in games.iter().flat_map(|game| &game.player_ranks) {
        totals
            .entry(rank.player_id.clone())
            .or_insert_with(|| PlayerPoints {
                name: rank.player_name.clone(),
                player_id: rank.player_id.clone(),
                points: 0,
            })
            .points += rank.points;
    }

    let mut game_result: Vec<PlayerPoints> = totals.into_values().collect();
    game_result.sort_by(|a, b| b.points.cmp(&a.points).then(a.name.cmp(&b.name)));

    TournamentEndedEvent {
        tournament_name: tournament_name.to_string(),
        player_winner_id: game_result
            .first()
            .map(|p| p.player_id.clone())
            .unwrap_or_default(),
        game_result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::events::PlayerRank;

    #[derive(Default)]
    struct ScriptedBot {
        name: String,
        mode: GameMode,
        auto_start: bool,
        stale_moves: bool,
        events: Vec<String>,
        ticks: Vec<u64>,
    }

    impl ScriptedBot {
        fn new(name: &str, mode: GameMode) -> Self {
            Self {
                name: name.to_string(),
                mode,
                auto_start: true,
                ..Self::default()
            }
        }
    }

    impl PaintbotHandler for ScriptedBot {
        fn name(&self) -> String {
            self.name.clone()
        }

        fn game_mode(&self) -> GameMode {
            self.mode
        }

        fn on_connected(&mut self, client: &mut dyn GameClient) {
            self.events.push("connected".to_string());
            client.register_for_game(default_settings(self.mode));
        }

        fn on_player_registered(&mut self, client: &mut dyn GameClient, _: &PlayerRegistered) {
            self.events.push("registered".to_string());
            if self.auto_start {
                client.start_game();
            }
        }

        fn on_map_update(&mut self, client: &mut dyn GameClient, event: &MapUpdateEvent) {
            assert_eq!(client.player_id(), event.receiving_player_id);
            self.ticks.push(event.game_tick);
            let tick = if self.stale_moves {
                event.game_tick + 1
            } else {
                event.game_tick
            };
            client.register_move(tick, CharacterAction::Right);
        }

        fn on_invalid_player_name(&mut self, event: &InvalidPlayerName) {
            self.events.push(format!("invalid {:?}", event.reason_code));
        }

        fn on_game_starting(&mut self, _: &GameStartingEvent) {
            self.events.push("starting".to_string());
        }

        fn on_game_link(&mut self, event: &GameLinkEvent) {
            self.events.push(event.url.clone());
        }

        fn on_game_ended(&mut self, _: &GameEndedEvent) {
            self.events.push("ended".to_string());
        }

        fn on_game_result(&mut self, _: &GameResultEvent) {
            self.events.push("result".to_string());
        }

        fn on_tournament_ended(&mut self, _: &TournamentEndedEvent) {
            self.events.push("tournament".to_string());
        }

        fn on_session_closed(&mut self) {
            self.events.push("closed".to_string());
        }
    }

    fn config() -> ArenaConfig {
        ArenaConfig {
            width: 20,
            height: 20,
            opponents: 2,
            tournament_rounds: 2,
            seed: Some(11),
            ..ArenaConfig::default()
        }
    }

    fn play(config: ArenaConfig, bot: ScriptedBot) -> SessionOutcome<ScriptedBot> {
        LocalSession::connect(config, bot).unwrap().join().unwrap()
    }

    #[test]
    fn test_training_session_event_order() {
        let outcome = play(config(), ScriptedBot::new("tester", GameMode::Training));
        let bot = &outcome.handler;
        let game_id = &outcome.game_results[0].game_id;

        assert_eq!(
            vec![
                "connected".to_string(),
                "registered".to_string(),
                "starting".to_string(),
                format!("http://localhost:8080/game/{game_id}"),
                "ended".to_string(),
                "result".to_string(),
                "closed".to_string(),
            ],
            bot.events
        );

        let ticks = GameSettings::training_world().duration_in_ticks();
        assert_eq!((0..ticks).collect::<Vec<u64>>(), bot.ticks);
        assert_eq!(3, outcome.game_results[0].player_ranks.len());
        assert!(outcome.tournament.is_none());
    }

    #[test]
    fn test_training_waits_for_start() {
        let mut bot = ScriptedBot::new("tester", GameMode::Training);
        bot.auto_start = false;

        let outcome = play(config(), bot);

        assert!(outcome.game_results.is_empty());
        assert!(outcome.handler.ticks.is_empty());
        assert_eq!(
            vec!["connected", "registered", "closed"],
            outcome.handler.events
        );
    }

    #[test]
    fn test_tournament_plays_every_round() {
        let outcome = play(config(), ScriptedBot::new("tester", GameMode::Tournament));

        assert_eq!(2, outcome.game_results.len());
        let tournament = outcome.tournament.unwrap();
        assert_eq!(3, tournament.game_result.len());
        assert_eq!(tournament.game_result[0].player_id, tournament.player_winner_id);
        assert_eq!(
            Some(&"closed".to_string()),
            outcome.handler.events.last()
        );
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        for (name, reason) in [
            ("   ", PlayerNameInvalidReason::Empty),
            ("Wanderer 1", PlayerNameInvalidReason::Taken),
            (
                "a name that is far too long for the arena",
                PlayerNameInvalidReason::TooLong,
            ),
        ] {
            let outcome = play(config(), ScriptedBot::new(name, GameMode::Training));

            assert_eq!(
                vec![
                    "connected".to_string(),
                    format!("invalid {reason:?}"),
                    "closed".to_string()
                ],
                outcome.handler.events
            );
            assert!(outcome.game_results.is_empty());
        }
    }

    #[test]
    fn test_stale_moves_are_ignored() {
        let mut bot = ScriptedBot::new("tester", GameMode::Training);
        bot.stale_moves = true;
        let mut client = LocalClient::new();

        client.register_move(4, CharacterAction::Up);
        assert_eq!(CharacterAction::Stay, client.take_move(3));
        assert!(client.moves.is_empty());

        client.register_move(3, CharacterAction::Up);
        client.register_move(3, CharacterAction::Down);
        assert_eq!(CharacterAction::Up, client.take_move(3));

        // a bot always answering for the wrong tick never leaves its spawn tile
        let outcome = play(config(), bot);
        let me = outcome.game_results[0]
            .player_ranks
            .iter()
            .find(|rank| rank.player_id == LOCAL_PLAYER_ID)
            .unwrap();
        assert_eq!(1, me.points);
    }

    #[test]
    fn test_connect_fails_fast_on_bad_arena() {
        let too_many = ArenaConfig {
            opponents: 9,
            ..config()
        };
        let too_small = ArenaConfig {
            width: 2,
            ..config()
        };
        let no_rounds = ArenaConfig {
            tournament_rounds: 0,
            ..config()
        };

        assert_eq!(
            Some(ClientError::TooManyPlayers {
                requested: 10,
                max: 5
            }),
            LocalSession::connect(too_many, ScriptedBot::new("a", GameMode::Training)).err()
        );
        assert_eq!(
            Some(ClientError::WorldTooSmall {
                width: 2,
                height: 20
            }),
            LocalSession::connect(too_small, ScriptedBot::new("a", GameMode::Training)).err()
        );
        assert_eq!(
            Some(ClientError::NoTournamentRounds),
            LocalSession::connect(no_rounds, ScriptedBot::new("a", GameMode::Tournament)).err()
        );
    }

    #[test]
    fn test_liveness_drops_when_session_ends() {
        let session =
            LocalSession::connect(config(), ScriptedBot::new("tester", GameMode::Training))
                .unwrap();
        let liveness = session.liveness();

        session.join().unwrap();

        assert!(!liveness.is_playing());
    }

    #[test]
    fn test_monitor_returns_after_session_closes() {
        let session =
            LocalSession::connect(config(), ScriptedBot::new("tester", GameMode::Training))
                .unwrap();
        let liveness = session.liveness();
        let monitor = liveness.spawn_monitor(Duration::from_millis(5)).unwrap();

        monitor.join().unwrap();

        assert!(!liveness.is_playing());
        assert_eq!(1, session.join().unwrap().game_results.len());
    }

    #[test]
    fn test_tournament_totals() {
        let rank = |id: &str, points| PlayerRank {
            player_name: id.to_string(),
            player_id: id.to_string(),
            rank: 1,
            points,
        };
        let games = vec![
            GameResultEvent {
                game_id: "a".to_string(),
                player_ranks: vec![rank("x", 10), rank("y", 4)],
            },
            GameResultEvent {
                game_id: "b".to_string(),
                player_ranks: vec![rank("y", 9), rank("x", 1)],
            },
        ];

        let ended = tournament_result("cup", &games);

        assert_eq!("y", ended.player_winner_id);
        assert_eq!(13, ended.game_result[0].points);
        assert_eq!(11, ended.game_result[1].points);
    }
}
