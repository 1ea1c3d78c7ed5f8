use std::fmt;

use crate::grid::{is_body_collision, is_self_collision, Board, Direction, Food, Position};
use crate::log;
use crate::rng::GameRng;
use crate::snake::Snake;
use super::diagnostics::DiagnosticsCollector;
use super::registry::NpcRegistry;
use super::types::{NpcSnake, Personality};

const RISK_THRESHOLD: f32 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecisionKind {
    Chosen,
    Mistake,
    RiskTaken,
    Desperate,
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decision {
    pub direction: Direction,
    pub confidence: f32,
    pub kind: DecisionKind,
}

impl Decision {
    fn new(direction: Direction, confidence: f32, kind: DecisionKind) -> Self {
        Self {
            direction,
            confidence: confidence.clamp(0.0, 1.0),
            kind,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DecisionError {
    NonFiniteScore { direction: Direction, score: f32 },
}

impl fmt::Display for DecisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionError::NonFiniteScore { direction, score } => {
                write!(f, "non-finite score {} for {:?}", score, direction)
            }
        }
    }
}

impl std::error::Error for DecisionError {}

pub struct WorldView<'a> {
    pub board: Board,
    pub food: &'a [Food],
    pub player: Option<&'a Snake>,
    pub npcs: &'a NpcRegistry,
}

impl WorldView<'_> {
    fn nearest_food(&self, from: Position) -> Option<Position> {
        self.food
            .iter()
            .map(|f| f.position)
            .min_by_key(|p| from.manhattan_distance(*p))
    }

    fn others<'s>(&'s self, npc: &'s NpcSnake) -> impl Iterator<Item = &'s NpcSnake> + 's {
        self.npcs
            .iter()
            .filter(move |other| other.id != npc.id && other.is_on_board())
    }

    fn threat_heads(&self, npc: &NpcSnake) -> Vec<Position> {
        self.player
            .map(|p| p.head())
            .into_iter()
            .chain(self.others(npc).map(|other| other.snake.head()))
            .collect()
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    direction: Direction,
    position: Position,
    in_bounds: bool,
    safe: bool,
}

pub struct DecisionEngine;

impl DecisionEngine {
    pub fn decide(
        npc: &NpcSnake,
        world: &WorldView,
        rng: &mut GameRng,
        diagnostics: &mut impl DiagnosticsCollector,
    ) -> Decision {
        let decision = match Self::try_decide(npc, world, rng) {
            Ok(decision) => decision,
            Err(err) => {
                log!("[{}] decision failed, keeping heading: {}", npc.id, err);
                diagnostics.record_failure(npc.id, &err);
                Decision::new(npc.snake.direction(), 0.0, DecisionKind::Fallback)
            }
        };
        diagnostics.record_decision(npc.id, &decision);
        decision
    }

    fn try_decide(npc: &NpcSnake, world: &WorldView, rng: &mut GameRng) -> Result<Decision, DecisionError> {
        let candidates = Self::candidates(npc, world);
        let safe: Vec<Candidate> = candidates.iter().copied().filter(|c| c.safe).collect();
        let target = world.nearest_food(npc.snake.head());

        if safe.is_empty() {
            return Self::desperate(npc, &candidates, target, world, rng);
        }

        if safe.len() > 1
            && rng.chance(npc.difficulty.mistake_chance())
            && let Some(pick) = rng.pick(&safe)
        {
            return Ok(Decision::new(pick.direction, 0.3, DecisionKind::Mistake));
        }

        let confidence = 0.5 + 0.5 * safe.len() as f32 / candidates.len().max(1) as f32;
        let chosen = match npc.personality {
            Personality::Aggressive => Self::best_by_food(npc, &safe, target, world)?,
            Personality::Defensive => Self::least_threatened(npc, &safe, target, world)?,
            Personality::Balanced => Self::best_balanced(npc, &safe, target, world)?,
            Personality::Random => {
                if let Some(pick) = rng.pick(&safe) {
                    return Ok(Decision::new(
                        pick.direction,
                        1.0 / safe.len() as f32,
                        DecisionKind::Chosen,
                    ));
                }
                None
            }
        };
        match chosen {
            Some(chosen) => Ok(Decision::new(chosen.direction, confidence, DecisionKind::Chosen)),
            None => Self::desperate(npc, &candidates, target, world, rng),
        }
    }

    fn candidates(npc: &NpcSnake, world: &WorldView) -> Vec<Candidate> {
        npc.snake
            .direction()
            .non_reversing()
            .map(|direction| {
                let position = npc.snake.head().step(direction);
                let in_bounds = world.board.contains(position);
                let safe = in_bounds && Self::is_safe(position, npc, world);
                Candidate {
                    direction,
                    position,
                    in_bounds,
                    safe,
                }
            })
            .collect()
    }

    fn is_safe(position: Position, npc: &NpcSnake, world: &WorldView) -> bool {
        if is_self_collision(position, npc.snake.body()) {
            return false;
        }
        if let Some(player) = world.player
            && is_body_collision(position, player.body())
        {
            return false;
        }
        !world
            .others(npc)
            .any(|other| is_body_collision(position, other.snake.body()))
    }

    fn desperate(
        npc: &NpcSnake,
        candidates: &[Candidate],
        target: Option<Position>,
        world: &WorldView,
        rng: &mut GameRng,
    ) -> Result<Decision, DecisionError> {
        if npc.personality == Personality::Random
            && let Some(pick) = rng.pick(candidates)
        {
            return Ok(Decision::new(pick.direction, 0.1, DecisionKind::Desperate));
        }

        let on_board: Vec<Candidate> = candidates.iter().copied().filter(|c| c.in_bounds).collect();

        if npc.personality == Personality::Aggressive
            && npc.tuning.risk_tolerance >= RISK_THRESHOLD
            && let Some(gamble) = Self::best_by_food(npc, &on_board, target, world)?
        {
            return Ok(Decision::new(gamble.direction, 0.2, DecisionKind::RiskTaken));
        }

        let direction = on_board
            .first()
            .or(candidates.first())
            .map(|c| c.direction)
            .unwrap_or(npc.snake.direction());
        Ok(Decision::new(direction, 0.1, DecisionKind::Desperate))
    }

    fn closeness(position: Position, target: Option<Position>, board: &Board) -> f32 {
        match target {
            Some(target) => {
                let max = board.max_distance().max(1) as f32;
                1.0 - position.manhattan_distance(target) as f32 / max
            }
            None => 0.0,
        }
    }

    fn threat(position: Position, heads: &[Position], radius: u32) -> f32 {
        heads
            .iter()
            .map(|head| position.manhattan_distance(*head))
            .filter(|d| *d <= radius)
            .map(|d| 1.0 / (1.0 + d as f32))
            .sum()
    }

    fn checked(direction: Direction, score: f32) -> Result<f32, DecisionError> {
        if score.is_finite() {
            Ok(score)
        } else {
            Err(DecisionError::NonFiniteScore { direction, score })
        }
    }

    // Ties keep the earlier candidate.
    fn best_scored<F>(candidates: &[Candidate], mut score: F) -> Result<Option<Candidate>, DecisionError>
    where
        F: FnMut(&Candidate) -> f32,
    {
        let mut best: Option<(Candidate, f32)> = None;
        for candidate in candidates {
            let value = Self::checked(candidate.direction, score(candidate))?;
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((*candidate, value)),
            }
        }
        Ok(best.map(|(c, _)| c))
    }

    fn best_by_food(
        npc: &NpcSnake,
        candidates: &[Candidate],
        target: Option<Position>,
        world: &WorldView,
    ) -> Result<Option<Candidate>, DecisionError> {
        Self::best_scored(candidates, |c| {
            npc.tuning.food_weight * Self::closeness(c.position, target, &world.board)
        })
    }

    fn least_threatened(
        npc: &NpcSnake,
        candidates: &[Candidate],
        target: Option<Position>,
        world: &WorldView,
    ) -> Result<Option<Candidate>, DecisionError> {
        let heads = world.threat_heads(npc);
        // Threat dominates; closeness to food only breaks ties.
        Self::best_scored(candidates, |c| {
            let threat = Self::threat(c.position, &heads, npc.tuning.threat_radius);
            -npc.tuning.safety_weight * threat * 100.0 + Self::closeness(c.position, target, &world.board)
        })
    }

    fn best_balanced(
        npc: &NpcSnake,
        candidates: &[Candidate],
        target: Option<Position>,
        world: &WorldView,
    ) -> Result<Option<Candidate>, DecisionError> {
        Self::best_scored(candidates, |c| {
            npc.tuning.food_weight * Self::closeness(c.position, target, &world.board)
                + npc.tuning.safety_weight
        })
    }
}
