use crate::settings::{GameConfig, SpeedCurve};

// Non-increasing in `score` and never below `min_speed_ms`.
pub fn speed_for_score(score: u32, config: &GameConfig) -> u32 {
    let level = score / config.points_per_level.max(1);
    let interval = match config.speed_curve {
        SpeedCurve::Linear => config
            .initial_speed_ms
            .saturating_sub(level.saturating_mul(config.speed_increment_ms)),
        SpeedCurve::Exponential { decay } => {
            let decay = decay.clamp(f64::MIN_POSITIVE, 1.0);
            let scaled = f64::from(config.initial_speed_ms) * decay.powi(level.min(i32::MAX as u32) as i32);
            scaled.floor() as u32
        }
    };
    interval.max(config.min_speed_ms)
}
