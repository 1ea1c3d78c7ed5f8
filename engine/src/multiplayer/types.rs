use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::MatchId;
use crate::snake::Snake;
use crate::types::{DeathReason, PlayerSlot, PlayerStats};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Competitive,
    Cooperative,
    Survival,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeRules {
    pub allow_player_collision: bool,
    pub shared_food: bool,
    pub end_on_first_death: bool,
    pub food_count: usize,
    pub score_limit: Option<u32>,
    pub combined_target: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    ScoreLimitReached,
    TargetScoreReached,
    WallCollision,
    SelfCollision,
    PlayerCollision,
    AllEliminated,
    Conceded,
}

impl From<DeathReason> for EndReason {
    fn from(reason: DeathReason) -> Self {
        match reason {
            DeathReason::WallCollision => EndReason::WallCollision,
            DeathReason::SelfCollision => EndReason::SelfCollision,
            DeathReason::PlayerCollision | DeathReason::NpcCollision => EndReason::PlayerCollision,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Match {
    pub id: MatchId,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub winner: Option<PlayerSlot>,
    pub end_reason: Option<EndReason>,
}

impl Match {
    pub fn begin(id: MatchId) -> Self {
        Self {
            id,
            started_at: Utc::now(),
            ended_at: None,
            winner: None,
            end_reason: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.end_reason.is_some()
    }

    pub fn finish(&mut self, winner: Option<PlayerSlot>, reason: EndReason) {
        self.ended_at = Some(Utc::now());
        self.winner = winner;
        self.end_reason = Some(reason);
    }
}

#[derive(Clone, Debug)]
pub struct PlayerEntity {
    pub slot: PlayerSlot,
    pub snake: Snake,
    pub stats: PlayerStats,
    pub ready: bool,
    pub death_reason: Option<DeathReason>,
    pub eliminated_at: Option<u64>,
}

impl PlayerEntity {
    pub fn new(slot: PlayerSlot, snake: Snake) -> Self {
        Self {
            slot,
            stats: PlayerStats::new(snake.len()),
            snake,
            ready: false,
            death_reason: None,
            eliminated_at: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.death_reason.is_none()
    }
}
