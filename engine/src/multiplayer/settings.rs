use serde::{Deserialize, Serialize};

use crate::config::Validate;
use crate::settings::GameConfig;
use super::types::{GameMode, ModeRules};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultiplayerConfig {
    pub game: GameConfig,
    pub mode: GameMode,
    pub score_limit: u32,
    pub cooperative_target: u32,
    #[serde(default)]
    pub food_count: Option<usize>,
}

impl MultiplayerConfig {
    pub fn with_mode(mode: GameMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn rules(&self) -> ModeRules {
        let rules = match self.mode {
            GameMode::Competitive => ModeRules {
                allow_player_collision: true,
                shared_food: true,
                end_on_first_death: false,
                food_count: 3,
                score_limit: Some(self.score_limit),
                combined_target: None,
            },
            GameMode::Cooperative => ModeRules {
                allow_player_collision: false,
                shared_food: true,
                end_on_first_death: true,
                food_count: 2,
                score_limit: None,
                combined_target: Some(self.cooperative_target),
            },
            GameMode::Survival => ModeRules {
                allow_player_collision: true,
                shared_food: false,
                end_on_first_death: false,
                food_count: 2,
                score_limit: None,
                combined_target: None,
            },
        };

        match self.food_count {
            Some(food_count) => ModeRules { food_count, ..rules },
            None => rules,
        }
    }
}

impl Default for MultiplayerConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            mode: GameMode::Competitive,
            score_limit: 200,
            cooperative_target: 300,
            food_count: None,
        }
    }
}

impl Validate for MultiplayerConfig {
    fn validate(&self) -> Result<(), String> {
        self.game.validate()?;
        if self.game.initial_length as i32 * 2 > self.game.board_width {
            return Err("two snakes of initial_length must fit side by side".to_string());
        }
        if self.score_limit == 0 {
            return Err("score_limit must be greater than 0".to_string());
        }
        if self.cooperative_target == 0 {
            return Err("cooperative_target must be greater than 0".to_string());
        }
        if let Some(food_count) = self.food_count
            && !(1..=20).contains(&food_count)
        {
            return Err("food_count must be between 1 and 20".to_string());
        }
        Ok(())
    }
}
