use ringbuffer::{AllocRingBuffer, RingBuffer};

use crate::grid::Position;
use crate::identifiers::{MatchId, NpcId};
use crate::multiplayer::EndReason;
use crate::types::{Actor, DeathReason, Phase, PlayerSlot};

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    PhaseChanged { from: Phase, to: Phase },
    FoodConsumed { actor: Actor, position: Position, value: u32 },
    SpeedChanged { interval_ms: u32 },
    Collision { actor: Actor, reason: DeathReason, position: Position },
    GameOver { score: u32 },
    PlayerEliminated { slot: PlayerSlot, reason: DeathReason },
    NpcEliminated { npc: NpcId, reason: DeathReason, score: u32 },
    MatchStarted { match_id: MatchId },
    MatchEnded { match_id: MatchId, winner: Option<PlayerSlot>, reason: EndReason },
}

pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

impl EventSink for () {
    fn emit(&mut self, _event: GameEvent) {}
}

pub struct EventLog {
    events: AllocRingBuffer<GameEvent>,
    total: u64,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: AllocRingBuffer::new(capacity.max(1)),
            total: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn recent(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        let events = self.events.to_vec();
        self.events.clear();
        events
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: GameEvent) {
        self.total += 1;
        self.events.enqueue(event);
    }
}
