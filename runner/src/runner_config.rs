use serde::{Deserialize, Serialize};
use snake_engine::config::{ConfigFile, Validate};
use snake_engine::multiplayer::{GameMode, MultiplayerConfig};
use snake_engine::npc::{Difficulty, NpcConfig, Personality};
use snake_engine::GameConfig;

pub const CONFIG_FILE: &str = "snake_runner_config.yaml";

pub fn config_file(path: Option<&str>) -> ConfigFile<RunnerConfig> {
    ConfigFile::yaml(path.unwrap_or(CONFIG_FILE))
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct RunnerConfig {
    pub game: GameConfig,
    pub mode: GameMode,
    pub score_limit: u32,
    pub cooperative_target: u32,
    #[serde(default)]
    pub food_count: Option<usize>,
    pub npcs: Vec<NpcConfig>,
    pub max_ticks: u64,
    // Wait `speed_ms` between ticks instead of running flat out.
    pub realtime: bool,
    pub event_history: usize,
}

impl RunnerConfig {
    pub fn multiplayer(&self) -> MultiplayerConfig {
        MultiplayerConfig {
            game: self.game.clone(),
            mode: self.mode,
            score_limit: self.score_limit,
            cooperative_target: self.cooperative_target,
            food_count: self.food_count,
        }
    }
}

impl Validate for RunnerConfig {
    fn validate(&self) -> Result<(), String> {
        self.multiplayer().validate()?;
        for npc in &self.npcs {
            npc.validate()?;
        }
        if self.npcs.len() > 16 {
            return Err("at most 16 NPCs are supported".to_string());
        }
        if self.max_ticks == 0 {
            return Err("max_ticks must be greater than 0".to_string());
        }
        if self.event_history == 0 {
            return Err("event_history must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        let multiplayer = MultiplayerConfig::default();
        Self {
            game: multiplayer.game,
            mode: multiplayer.mode,
            score_limit: multiplayer.score_limit,
            cooperative_target: multiplayer.cooperative_target,
            food_count: multiplayer.food_count,
            npcs: vec![
                NpcConfig::new(Personality::Aggressive, Difficulty::Medium),
                NpcConfig::new(Personality::Defensive, Difficulty::Hard),
                NpcConfig::new(Personality::Balanced, Difficulty::Easy),
            ],
            max_ticks: 2_000,
            realtime: false,
            event_history: 64,
        }
    }
}
