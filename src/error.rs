use core::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientError {
    WorldTooSmall { width: i32, height: i32 },
    TooManyPlayers { requested: u32, max: u32 },
    NoTicksPerGame,
    NoTournamentRounds,
    SessionSpawn { reason: String },
    SessionPanicked,
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WorldTooSmall { width, height } => {
                write!(f, "world of {width}x{height} tiles is too small to play on")
            }
            Self::TooManyPlayers { requested, max } => {
                write!(f, "{requested} players requested, the game allows at most {max}")
            }
            Self::NoTicksPerGame => write!(f, "game settings yield a game without any tick"),
            Self::NoTournamentRounds => write!(f, "a tournament needs at least one round"),
            Self::SessionSpawn { reason } => {
                write!(f, "session thread could not be started: {reason}")
            }
            Self::SessionPanicked => write!(f, "session thread panicked"),
        }
    }
}

impl std::error::Error for ClientError {}
