use ringbuffer::{AllocRingBuffer, RingBuffer};

use crate::identifiers::NpcId;
use super::decision::{Decision, DecisionError, DecisionKind};

pub trait DiagnosticsCollector {
    fn record_failure(&mut self, npc: NpcId, error: &DecisionError);

    fn record_decision(&mut self, _npc: NpcId, _decision: &Decision) {}
}

impl DiagnosticsCollector for () {
    fn record_failure(&mut self, _npc: NpcId, _error: &DecisionError) {}
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecisionFailure {
    pub npc: NpcId,
    pub error: DecisionError,
}

pub struct DecisionDiagnostics {
    failures: AllocRingBuffer<DecisionFailure>,
    failure_count: u64,
    decision_count: u64,
    desperate_count: u64,
    mistake_count: u64,
}

impl DecisionDiagnostics {
    pub fn new(capacity: usize) -> Self {
        Self {
            failures: AllocRingBuffer::new(capacity.max(1)),
            failure_count: 0,
            decision_count: 0,
            desperate_count: 0,
            mistake_count: 0,
        }
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count
    }

    pub fn decision_count(&self) -> u64 {
        self.decision_count
    }

    pub fn desperate_count(&self) -> u64 {
        self.desperate_count
    }

    pub fn mistake_count(&self) -> u64 {
        self.mistake_count
    }

    pub fn recent_failures(&self) -> impl Iterator<Item = &DecisionFailure> {
        self.failures.iter()
    }

    pub fn clear(&mut self) {
        self.failures.clear();
        self.failure_count = 0;
        self.decision_count = 0;
        self.desperate_count = 0;
        self.mistake_count = 0;
    }
}

impl Default for DecisionDiagnostics {
    fn default() -> Self {
        Self::new(32)
    }
}

impl DiagnosticsCollector for DecisionDiagnostics {
    fn record_failure(&mut self, npc: NpcId, error: &DecisionError) {
        self.failure_count += 1;
        self.failures.enqueue(DecisionFailure {
            npc,
            error: error.clone(),
        });
    }

    fn record_decision(&mut self, _npc: NpcId, decision: &Decision) {
        self.decision_count += 1;
        match decision.kind {
            DecisionKind::Desperate | DecisionKind::RiskTaken => self.desperate_count += 1,
            DecisionKind::Mistake => self.mistake_count += 1,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction;

    fn failure() -> DecisionError {
        DecisionError::NonFiniteScore {
            direction: Direction::Up,
            score: f32::INFINITY,
        }
    }

    #[test]
    fn test_failures_are_bounded() {
        let mut diagnostics = DecisionDiagnostics::new(2);
        for n in 1..=3 {
            diagnostics.record_failure(NpcId::new(n), &failure());
        }
        assert_eq!(diagnostics.failure_count(), 3);
        let ids: Vec<NpcId> = diagnostics.recent_failures().map(|f| f.npc).collect();
        assert_eq!(ids, vec![NpcId::new(2), NpcId::new(3)]);
    }

    #[test]
    fn test_decision_counters() {
        let mut diagnostics = DecisionDiagnostics::default();
        let decision = |kind| Decision {
            direction: Direction::Left,
            confidence: 0.1,
            kind,
        };
        diagnostics.record_decision(NpcId::new(1), &decision(DecisionKind::Chosen));
        diagnostics.record_decision(NpcId::new(1), &decision(DecisionKind::Desperate));
        diagnostics.record_decision(NpcId::new(1), &decision(DecisionKind::Mistake));
        assert_eq!(diagnostics.decision_count(), 3);
        assert_eq!(diagnostics.desperate_count(), 1);
        assert_eq!(diagnostics.mistake_count(), 1);

        diagnostics.clear();
        assert_eq!(diagnostics.decision_count(), 0);
    }
}
