use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identifiers::NpcId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Playing,
    Paused,
    GameOver,
}

impl Phase {
    pub fn is_running(self) -> bool {
        matches!(self, Phase::Playing | Phase::Paused)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub const BOTH: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    pub fn other(self) -> PlayerSlot {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerSlot::One => write!(f, "player 1"),
            PlayerSlot::Two => write!(f, "player 2"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
    PlayerCollision,
    NpcCollision,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Actor {
    Player(PlayerSlot),
    Npc(NpcId),
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Player(slot) => write!(f, "{}", slot),
            Actor::Npc(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub score: u32,
    pub food_eaten: u32,
    pub elapsed_ms: u64,
    pub moves_made: u32,
    pub longest_length: usize,
}

impl PlayerStats {
    pub fn new(initial_length: usize) -> Self {
        Self {
            longest_length: initial_length,
            ..Self::default()
        }
    }

    pub fn record_move(&mut self, interval_ms: u32, length: usize) {
        self.moves_made += 1;
        self.elapsed_ms += u64::from(interval_ms);
        self.longest_length = self.longest_length.max(length);
    }

    pub fn record_food(&mut self, value: u32) {
        self.score += value;
        self.food_eaten += 1;
    }
}
