use std::time::Duration;

use snake_engine::multiplayer::MultiplayerGameState;
use snake_engine::npc::{DecisionDiagnostics, NpcManager};
use snake_engine::single::{GameCommand, GameState};
use snake_engine::{log, Food, GameRng, Phase, PlayerSlot, Snake};
use tokio::time::{interval, Interval, MissedTickBehavior};

use crate::autopilot::Autopilot;
use crate::event_logger::EventLogger;
use crate::runner_config::RunnerConfig;

pub struct Ticker {
    interval: Option<Interval>,
    period_ms: u32,
}

impl Ticker {
    pub fn new(realtime: bool, period_ms: u32) -> Self {
        Self {
            interval: realtime.then(|| Self::make_interval(period_ms)),
            period_ms,
        }
    }

    fn make_interval(period_ms: u32) -> Interval {
        let mut timer = interval(Duration::from_millis(period_ms.max(1) as u64));
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer
    }

    pub async fn wait(&mut self, period_ms: u32) {
        match self.interval.as_mut() {
            Some(timer) => {
                if period_ms != self.period_ms {
                    self.period_ms = period_ms;
                    *timer = Self::make_interval(period_ms);
                    timer.tick().await;
                }
                timer.tick().await;
            }
            None => tokio::task::yield_now().await,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub ticks: u64,
    pub finished: bool,
    pub result: String,
}

pub async fn run_single(
    config: &RunnerConfig,
    rng: &mut GameRng,
    events: &mut EventLogger,
) -> Result<SessionSummary, String> {
    let mut state = GameState::new(config.game.clone(), rng);
    let mut ticker = Ticker::new(config.realtime, state.speed_ms());
    state.dispatch(GameCommand::Start, rng, events);

    let mut ticks = 0;
    while ticks < config.max_ticks && state.phase() != Phase::GameOver {
        let direction = Autopilot::steer(
            state.snake(),
            &[],
            std::slice::from_ref(state.food()),
            state.board(),
            rng,
        );
        state.dispatch(GameCommand::ChangeDirection(direction), rng, events);
        state.dispatch(GameCommand::Tick, rng, events);
        ticks += 1;
        ticker.wait(state.speed_ms()).await;
    }

    Ok(SessionSummary {
        ticks,
        finished: state.phase() == Phase::GameOver,
        result: format!(
            "score {}, length {}, food {}, speed {}ms",
            state.score(),
            state.snake().len(),
            state.stats().food_eaten,
            state.speed_ms()
        ),
    })
}

pub async fn run_multiplayer(
    config: &RunnerConfig,
    rng: &mut GameRng,
    events: &mut EventLogger,
) -> Result<SessionSummary, String> {
    let mut state = MultiplayerGameState::new(config.multiplayer(), rng);
    let mut ticker = Ticker::new(config.realtime, state.speed_ms());
    for slot in PlayerSlot::BOTH {
        state.toggle_ready(slot)?;
    }
    state.start(rng, events)?;

    let mut ticks = 0;
    while ticks < config.max_ticks && state.phase() != Phase::GameOver {
        for slot in PlayerSlot::BOTH {
            let player = state.player(slot);
            if !player.is_alive() {
                continue;
            }
            let direction = {
                let other = state.player(slot.other());
                let blockers: Vec<&Snake> = if other.is_alive() { vec![&other.snake] } else { Vec::new() };
                let edible: Vec<Food> = state
                    .food()
                    .iter()
                    .filter(|food| food.can_be_eaten_by(slot))
                    .copied()
                    .collect();
                Autopilot::steer(&player.snake, &blockers, &edible, state.board(), rng)
            };
            state.change_direction(slot, direction);
        }
        state.tick(rng, events);
        ticks += 1;
        ticker.wait(state.speed_ms()).await;
    }

    let scores = format!(
        "scores {} / {}",
        state.player(PlayerSlot::One).stats.score,
        state.player(PlayerSlot::Two).stats.score
    );
    let result = match state.match_record() {
        Some(record) if record.is_finished() => match (record.winner, record.end_reason) {
            (Some(winner), Some(reason)) => format!("{} won ({:?}), {}", winner, reason, scores),
            (None, Some(reason)) => format!("no winner ({:?}), {}", reason, scores),
            _ => format!("finished, {}", scores),
        },
        _ => format!("unfinished, {}", scores),
    };

    Ok(SessionSummary {
        ticks,
        finished: state.phase() == Phase::GameOver,
        result,
    })
}

pub async fn run_with_npcs(
    config: &RunnerConfig,
    rng: &mut GameRng,
    events: &mut EventLogger,
) -> Result<SessionSummary, String> {
    let mut state = GameState::new(config.game.clone(), rng);
    let mut manager = NpcManager::new();
    for npc in &config.npcs {
        if let Err(e) = manager.spawn(npc, &state, rng) {
            log!("Skipping NPC: {}", e);
        }
    }
    let mut diagnostics = DecisionDiagnostics::new(config.event_history);
    let mut ticker = Ticker::new(config.realtime, state.speed_ms());
    state.dispatch(GameCommand::Start, rng, events);

    let mut ticks = 0;
    while ticks < config.max_ticks && state.phase() != Phase::GameOver {
        let direction = {
            let blockers: Vec<&Snake> = manager
                .registry()
                .iter()
                .filter(|npc| npc.is_on_board())
                .map(|npc| &npc.snake)
                .collect();
            Autopilot::steer(
                state.snake(),
                &blockers,
                std::slice::from_ref(state.food()),
                state.board(),
                rng,
            )
        };
        state.change_direction(direction);
        manager.advance(&mut state, rng, &mut diagnostics, events);
        ticks += 1;
        ticker.wait(state.speed_ms()).await;
    }

    let npcs: Vec<String> = manager
        .registry()
        .iter()
        .map(|npc| format!("{} {} {:?} {}", npc.id, npc.name, npc.state, npc.score))
        .collect();
    Ok(SessionSummary {
        ticks,
        finished: state.phase() == Phase::GameOver,
        result: format!(
            "player score {}, npcs [{}], {} decisions, {} desperate, {} failures",
            state.score(),
            npcs.join(", "),
            diagnostics.decision_count(),
            diagnostics.desperate_count(),
            diagnostics.failure_count()
        ),
    })
}
