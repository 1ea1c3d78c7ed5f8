pub mod config;
pub mod difficulty;
pub mod events;
pub mod grid;
pub mod identifiers;
pub mod logger;
pub mod multiplayer;
pub mod npc;
pub mod rng;
pub mod settings;
pub mod single;
pub mod snake;
pub mod types;

pub use events::{EventLog, EventSink, GameEvent};
pub use grid::{Board, Direction, Food, Position};
pub use identifiers::{MatchId, NpcId};
pub use rng::GameRng;
pub use settings::{GameConfig, SpeedCurve};
pub use snake::Snake;
pub use types::{Actor, DeathReason, Phase, PlayerSlot, PlayerStats};
