mod game_state;

pub use game_state::{GameCommand, GameSnapshot, GameState, TickOutcome};
