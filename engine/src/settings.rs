use serde::{Deserialize, Serialize};

use crate::config::Validate;
use crate::grid::Board;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpeedCurve {
    Linear,
    Exponential { decay: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub board_width: i32,
    pub board_height: i32,
    pub initial_length: usize,
    pub initial_speed_ms: u32,
    pub speed_increment_ms: u32,
    pub min_speed_ms: u32,
    pub points_per_level: u32,
    pub food_value: u32,
    pub speed_curve: SpeedCurve,
}

impl GameConfig {
    pub fn board(&self) -> Board {
        Board::new(self.board_width, self.board_height)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 20,
            board_height: 20,
            initial_length: 3,
            initial_speed_ms: 150,
            speed_increment_ms: 10,
            min_speed_ms: 50,
            points_per_level: 50,
            food_value: 10,
            speed_curve: SpeedCurve::Linear,
        }
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        if self.board_width < 5 || self.board_height < 5 {
            return Err("board dimensions must be at least 5x5".to_string());
        }
        if self.board_width > 200 || self.board_height > 200 {
            return Err("board dimensions must not exceed 200x200".to_string());
        }
        if self.initial_length < 1 {
            return Err("initial_length must be at least 1".to_string());
        }
        if self.initial_length as i32 > self.board_width / 2 {
            return Err("initial_length must fit in half the board width".to_string());
        }
        if self.min_speed_ms == 0 {
            return Err("min_speed_ms must be greater than 0".to_string());
        }
        if self.initial_speed_ms < self.min_speed_ms {
            return Err("initial_speed_ms must not be below min_speed_ms".to_string());
        }
        if self.points_per_level == 0 {
            return Err("points_per_level must be greater than 0".to_string());
        }
        if self.food_value == 0 {
            return Err("food_value must be greater than 0".to_string());
        }
        if let SpeedCurve::Exponential { decay } = self.speed_curve
            && !(decay > 0.0 && decay <= 1.0)
        {
            return Err("exponential decay must be in (0, 1]".to_string());
        }
        Ok(())
    }
}
