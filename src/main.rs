#![deny(unsafe_code)]

mod api;
mod config;
mod engine;
mod error;
mod players;
mod printer;
mod terminal;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use api::{
    action::CharacterAction, events::MapUpdateEvent, map_utility::MapUtility, settings::GameMode,
};
use config::{default_bot_name, BotConfig, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT};
use engine::session::{
    ArenaConfig, LocalSession, DEFAULT_OPPONENTS, DEFAULT_TOURNAMENT_ROUNDS,
};
use players::simple_painter::{
    strategy::{self, BotState},
    SimplePainter,
};

const MONITOR_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(version, about = "A simple painting bot and the arena to train it in")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play against the local training arena
    Play(PlayArgs),
    /// Print the action the bot picks for a map update stored as JSON
    Decide(DecideArgs),
}

#[derive(Args, Debug, Default)]
struct PlayArgs {
    /// Name to register with, a random one when omitted
    #[arg(long, env = "PAINTBOT_NAME")]
    name: Option<String>,

    #[arg(long, value_enum, default_value_t = ModeArg::Training)]
    mode: ModeArg,

    /// Wait instead of starting the training game right after registering
    #[arg(long)]
    no_auto_start: bool,

    #[arg(long, default_value = DEFAULT_SERVER_HOST)]
    host: String,

    #[arg(long, default_value_t = DEFAULT_SERVER_PORT)]
    port: u16,

    /// Number of wandering opponents
    #[arg(long, default_value_t = DEFAULT_OPPONENTS)]
    opponents: u32,

    #[arg(long, default_value_t = DEFAULT_TOURNAMENT_ROUNDS)]
    rounds: u32,

    #[arg(long)]
    seed: Option<u64>,

    /// Play at the tick rate of the game instead of as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Draw the map every tick
    #[arg(long)]
    print_map: bool,
}

#[derive(Args, Debug)]
struct DecideArgs {
    /// JSON file holding a map update event
    #[arg(long)]
    snapshot: PathBuf,

    /// Player to decide for, defaults to the receiving player of the event
    #[arg(long)]
    player_id: Option<String>,

    #[arg(long, default_value_t = 0)]
    last_explosion_tick: u64,

    #[arg(long, value_enum, default_value_t = DirectionArg::Stay)]
    last_direction: DirectionArg,

    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    #[default]
    Training,
    Tournament,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Training => GameMode::Training,
            ModeArg::Tournament => GameMode::Tournament,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DirectionArg {
    Up,
    Down,
    Left,
    Right,
    Stay,
}

impl From<DirectionArg> for CharacterAction {
    fn from(direction: DirectionArg) -> Self {
        match direction {
            DirectionArg::Up => CharacterAction::Up,
            DirectionArg::Down => CharacterAction::Down,
            DirectionArg::Left => CharacterAction::Left,
            DirectionArg::Right => CharacterAction::Right,
            DirectionArg::Stay => CharacterAction::Stay,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::Decide(args)) => decide(args),
        Some(Command::Play(args)) => play(args),
        None => play(PlayArgs::parse_defaults()),
    }
}

impl PlayArgs {
    /// Arguments of `play` when no subcommand was given at all.
    fn parse_defaults() -> Self {
        Self {
            name: std::env::var("PAINTBOT_NAME").ok(),
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            opponents: DEFAULT_OPPONENTS,
            rounds: DEFAULT_TOURNAMENT_ROUNDS,
            ..Self::default()
        }
    }

    fn bot_config(&self) -> BotConfig {
        BotConfig {
            server_host: self.host.clone(),
            server_port: self.port,
            game_mode: self.mode.into(),
            bot_name: self.name.clone().unwrap_or_else(default_bot_name),
            auto_start_game: !self.no_auto_start,
            ansi_printer_active: self.print_map,
        }
    }

    fn arena_config(&self) -> ArenaConfig {
        ArenaConfig {
            opponents: self.opponents,
            tournament_rounds: self.rounds,
            seed: self.seed,
            realtime: self.realtime,
            server_host: self.host.clone(),
            server_port: self.port,
            ..ArenaConfig::default()
        }
    }
}

fn play(args: PlayArgs) -> anyhow::Result<()> {
    let bot_config = args.bot_config();
    info!(
        "Starting {} in {} mode",
        bot_config.bot_name, bot_config.game_mode
    );

    let painter = match args.seed {
        Some(seed) => SimplePainter::with_seed(bot_config, seed),
        None => SimplePainter::new(bot_config),
    };

    let session = match LocalSession::connect(args.arena_config(), painter) {
        Ok(session) => session,
        Err(err) => {
            error!("Could not connect to the game: {err}");
            std::process::exit(1);
        }
    };

    let monitor = session
        .liveness()
        .spawn_monitor(MONITOR_POLL_INTERVAL)
        .context("could not start the session monitor")?;
    monitor
        .join()
        .map_err(|_| anyhow!("session monitor panicked"))?;

    let outcome = session.join()?;
    info!("Played {} game(s)", outcome.game_results.len());

    Ok(())
}

fn decide(args: DecideArgs) -> anyhow::Result<()> {
    let action = decide_action(args)?;
    println!("{action}");

    Ok(())
}

fn decide_action(args: DecideArgs) -> anyhow::Result<CharacterAction> {
    let json = fs::read_to_string(&args.snapshot)
        .with_context(|| format!("could not read {}", args.snapshot.display()))?;
    let event: MapUpdateEvent = serde_json::from_str(&json)
        .with_context(|| format!("{} is not a map update event", args.snapshot.display()))?;
    if event.map.width <= 0 || event.map.height <= 0 {
        bail!(
            "{} holds a map of {}x{} tiles",
            args.snapshot.display(),
            event.map.width,
            event.map.height
        );
    }

    let player_id = args
        .player_id
        .unwrap_or_else(|| event.receiving_player_id.clone());
    let map_util = MapUtility::new(&event.map, &player_id)
        .with_context(|| format!("player {player_id} is not on the map"))?;

    let mut state = BotState {
        last_explosion_tick: args.last_explosion_tick,
        last_direction: args.last_direction.into(),
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    Ok(strategy::choose_action(
        &map_util,
        event.game_tick,
        &mut state,
        &mut rng,
    ))
}
