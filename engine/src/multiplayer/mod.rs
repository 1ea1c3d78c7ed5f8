mod game_state;
mod settings;
mod types;

pub use game_state::{MultiplayerGameState, MultiplayerSnapshot, PlayerSnapshot};
pub use settings::MultiplayerConfig;
pub use types::{EndReason, GameMode, Match, ModeRules, PlayerEntity};
