use std::collections::{HashMap, HashSet};

use crate::events::{EventSink, GameEvent};
use crate::grid::{is_body_collision, is_self_collision, is_wall_collision, Position};
use crate::identifiers::NpcId;
use crate::log;
use crate::rng::GameRng;
use crate::single::{GameState, TickOutcome};
use crate::types::{Actor, DeathReason, Phase};
use super::decision::{DecisionEngine, WorldView};
use super::diagnostics::DiagnosticsCollector;
use super::registry::NpcRegistry;
use super::types::NpcConfig;

#[derive(Clone, Debug, Default)]
pub struct NpcManager {
    registry: NpcRegistry,
}

impl NpcManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &NpcRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut NpcRegistry {
        &mut self.registry
    }

    pub fn spawn(&mut self, config: &NpcConfig, state: &GameState, rng: &mut GameRng) -> Result<NpcId, String> {
        let mut occupied: HashSet<Position> = state.snake().body().iter().copied().collect();
        occupied.insert(state.food().position);
        self.registry.spawn(config, state.board(), &occupied, rng)
    }

    // The player moves first with NPC bodies and destinations as obstacles;
    // if the player dies the NPCs stay put.
    pub fn advance(
        &mut self,
        state: &mut GameState,
        rng: &mut GameRng,
        diagnostics: &mut impl DiagnosticsCollector,
        events: &mut impl EventSink,
    ) -> TickOutcome {
        if state.phase() != Phase::Playing {
            return TickOutcome::Ignored;
        }

        self.decide_all(state, rng, diagnostics);
        let (moves, deaths) = self.plan_moves(state);

        let mut obstacles = self.registry.on_board_cells(None);
        obstacles.extend(moves.values().copied());

        let outcome = state.tick_with_obstacles(&obstacles, rng, events);
        if matches!(outcome, TickOutcome::Collided(_)) {
            return outcome;
        }

        for (id, reason, position) in deaths {
            self.eliminate(id, reason, position, events);
        }

        let mut ordered: Vec<(NpcId, Position)> = moves.into_iter().collect();
        ordered.sort_by_key(|&(id, _)| id);
        for (index, &(id, candidate)) in ordered.iter().enumerate() {
            let pending: Vec<Position> = ordered[index + 1..].iter().map(|&(_, p)| p).collect();
            self.move_npc(id, candidate, &pending, state, rng, events);
        }

        outcome
    }

    fn decide_all(&mut self, state: &GameState, rng: &mut GameRng, diagnostics: &mut impl DiagnosticsCollector) {
        let food = std::slice::from_ref(state.food());
        let mut decisions = Vec::new();
        {
            let world = WorldView {
                board: *state.board(),
                food,
                player: Some(state.snake()),
                npcs: &self.registry,
            };
            for npc in self.registry.iter().filter(|npc| npc.is_active()) {
                decisions.push((npc.id, DecisionEngine::decide(npc, &world, rng, diagnostics)));
            }
        }

        for (id, decision) in decisions {
            if let Some(npc) = self.registry.get_mut(id) {
                npc.snake.request_direction(decision.direction);
                npc.last_decision = Some(decision);
            }
        }
    }

    fn plan_moves(&self, state: &GameState) -> (HashMap<NpcId, Position>, Vec<(NpcId, DeathReason, Position)>) {
        let board = state.board();
        let player = state.snake();
        let player_candidate = player.next_head();

        let candidates: Vec<(NpcId, Position)> = self
            .registry
            .iter()
            .filter(|npc| npc.is_active())
            .map(|npc| (npc.id, npc.snake.next_head()))
            .collect();

        let mut moves = HashMap::new();
        let mut deaths = Vec::new();
        for &(id, candidate) in &candidates {
            let Some(npc) = self.registry.get(id) else {
                continue;
            };
            let others = self.registry.on_board_cells(Some(id));
            let head_on = candidates
                .iter()
                .any(|&(other, position)| other != id && position == candidate);

            let reason = if is_wall_collision(candidate, board) {
                Some(DeathReason::WallCollision)
            } else if is_self_collision(candidate, npc.snake.body()) {
                Some(DeathReason::SelfCollision)
            } else if is_body_collision(candidate, player.body()) || candidate == player_candidate {
                Some(DeathReason::PlayerCollision)
            } else if others.contains(&candidate) || head_on {
                Some(DeathReason::NpcCollision)
            } else {
                None
            };

            match reason {
                Some(reason) => deaths.push((id, reason, candidate)),
                None => {
                    moves.insert(id, candidate);
                }
            }
        }
        (moves, deaths)
    }

    fn eliminate(&mut self, id: NpcId, reason: DeathReason, position: Position, events: &mut impl EventSink) {
        if self.registry.eliminate(id, reason).is_err() {
            return;
        }
        let score = self.registry.get(id).map_or(0, |npc| npc.score);
        events.emit(GameEvent::Collision {
            actor: Actor::Npc(id),
            reason,
            position,
        });
        events.emit(GameEvent::NpcEliminated { npc: id, reason, score });
        log!("{} eliminated at {} ({:?}), score {}", id, position, reason, score);
    }

    fn move_npc(
        &mut self,
        id: NpcId,
        candidate: Position,
        pending: &[Position],
        state: &mut GameState,
        rng: &mut GameRng,
        events: &mut impl EventSink,
    ) {
        let food = *state.food();
        let Some(npc) = self.registry.get_mut(id) else {
            return;
        };
        let ate = candidate == food.position;
        npc.snake.advance(candidate, ate);
        if !ate {
            return;
        }

        npc.score += food.value;
        npc.food_eaten += 1;
        events.emit(GameEvent::FoodConsumed {
            actor: Actor::Npc(id),
            position: candidate,
            value: food.value,
        });
        // NPCs that have not moved yet still claim their destination.
        let mut occupied = self.registry.on_board_cells(None);
        occupied.extend(pending.iter().copied());
        state.respawn_food(&occupied, rng);
    }
}
