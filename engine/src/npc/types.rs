use serde::{Deserialize, Serialize};

use crate::config::Validate;
use crate::identifiers::NpcId;
use crate::snake::Snake;
use crate::types::DeathReason;
use super::decision::Decision;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    Aggressive,
    Defensive,
    Balanced,
    Random,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn mistake_chance(self) -> f32 {
        match self {
            Difficulty::Easy => 0.30,
            Difficulty::Medium => 0.15,
            Difficulty::Hard => 0.05,
            Difficulty::Expert => 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NpcState {
    Active,
    Paused,
    Eliminated,
    Inactive,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonalityConfig {
    pub food_weight: f32,
    pub safety_weight: f32,
    // At or above 0.7 an aggressive NPC with no safe move gambles on food.
    pub risk_tolerance: f32,
    pub threat_radius: u32,
}

impl PersonalityConfig {
    pub fn for_personality(personality: Personality) -> Self {
        match personality {
            Personality::Aggressive => Self {
                food_weight: 1.0,
                safety_weight: 0.2,
                risk_tolerance: 0.8,
                threat_radius: 2,
            },
            Personality::Defensive => Self {
                food_weight: 0.3,
                safety_weight: 1.0,
                risk_tolerance: 0.1,
                threat_radius: 5,
            },
            Personality::Balanced => Self {
                food_weight: 0.6,
                safety_weight: 0.4,
                risk_tolerance: 0.4,
                threat_radius: 3,
            },
            Personality::Random => Self {
                food_weight: 0.0,
                safety_weight: 1.0,
                risk_tolerance: 0.5,
                threat_radius: 3,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NpcConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub personality: Personality,
    pub difficulty: Difficulty,
    pub initial_length: usize,
    #[serde(default)]
    pub tuning: Option<PersonalityConfig>,
}

impl NpcConfig {
    pub fn new(personality: Personality, difficulty: Difficulty) -> Self {
        Self {
            name: None,
            personality,
            difficulty,
            initial_length: 3,
            tuning: None,
        }
    }

    pub fn personality_config(&self) -> PersonalityConfig {
        self.tuning
            .unwrap_or_else(|| PersonalityConfig::for_personality(self.personality))
    }
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self::new(Personality::Balanced, Difficulty::Medium)
    }
}

impl Validate for NpcConfig {
    fn validate(&self) -> Result<(), String> {
        if self.initial_length < 1 || self.initial_length > 10 {
            return Err("NPC initial_length must be between 1 and 10".to_string());
        }
        if let Some(tuning) = self.tuning
            && !(0.0..=1.0).contains(&tuning.risk_tolerance)
        {
            return Err("risk_tolerance must be between 0 and 1".to_string());
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct NpcSnake {
    pub id: NpcId,
    pub name: String,
    pub snake: Snake,
    pub personality: Personality,
    pub difficulty: Difficulty,
    pub tuning: PersonalityConfig,
    pub state: NpcState,
    pub score: u32,
    pub food_eaten: u32,
    pub death_reason: Option<DeathReason>,
    pub last_decision: Option<Decision>,
}

impl NpcSnake {
    pub fn is_active(&self) -> bool {
        self.state == NpcState::Active
    }

    pub fn is_on_board(&self) -> bool {
        matches!(self.state, NpcState::Active | NpcState::Paused)
    }
}
