use snake_engine::{log, EventLog, EventSink, GameEvent};

pub struct EventLogger {
    history: EventLog,
    verbose: bool,
}

impl EventLogger {
    pub fn new(history: usize, verbose: bool) -> Self {
        Self {
            history: EventLog::new(history),
            verbose,
        }
    }

    pub fn history(&self) -> &EventLog {
        &self.history
    }

    fn describe(event: &GameEvent) -> Option<String> {
        let text = match event {
            GameEvent::PhaseChanged { from, to } => format!("phase {:?} -> {:?}", from, to),
            GameEvent::FoodConsumed { actor, position, value } => {
                format!("{} ate {} at {}", actor, value, position)
            }
            GameEvent::SpeedChanged { interval_ms } => format!("speed now {}ms", interval_ms),
            GameEvent::Collision { actor, reason, position } => {
                format!("{} hit {:?} at {}", actor, reason, position)
            }
            GameEvent::GameOver { score } => format!("game over, score {}", score),
            GameEvent::PlayerEliminated { slot, reason } => format!("{} out ({:?})", slot, reason),
            // Already logged by the engine.
            GameEvent::NpcEliminated { .. } | GameEvent::MatchStarted { .. } | GameEvent::MatchEnded { .. } => {
                return None;
            }
        };
        Some(text)
    }
}

impl EventSink for EventLogger {
    fn emit(&mut self, event: GameEvent) {
        if self.verbose
            && let Some(text) = Self::describe(&event)
        {
            log!("{}", text);
        }
        self.history.emit(event);
    }
}
