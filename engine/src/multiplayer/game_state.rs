use std::collections::HashSet;

use crate::difficulty::speed_for_score;
use crate::events::{EventSink, GameEvent};
use crate::grid::{
    is_body_collision, is_self_collision, is_wall_collision, Board, Direction, Food, FoodSpawner, Position,
};
use crate::identifiers::MatchId;
use crate::log;
use crate::rng::GameRng;
use crate::snake::Snake;
use crate::types::{Actor, DeathReason, Phase, PlayerSlot, PlayerStats};
use super::settings::MultiplayerConfig;
use super::types::{EndReason, GameMode, Match, ModeRules, PlayerEntity};

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSnapshot {
    pub slot: PlayerSlot,
    pub body: Vec<Position>,
    pub direction: Direction,
    pub stats: PlayerStats,
    pub alive: bool,
    pub ready: bool,
    pub death_reason: Option<DeathReason>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MultiplayerSnapshot {
    pub phase: Phase,
    pub mode: GameMode,
    pub players: [PlayerSnapshot; 2],
    pub food: Vec<Food>,
    pub speed_ms: u32,
    pub tick: u64,
    pub match_record: Option<Match>,
}

#[derive(Clone, Copy, Debug)]
struct PlannedMove {
    slot: PlayerSlot,
    candidate: Position,
    death: Option<DeathReason>,
}

#[derive(Clone, Debug)]
pub struct MultiplayerGameState {
    phase: Phase,
    players: [PlayerEntity; 2],
    food: Vec<Food>,
    board: Board,
    rules: ModeRules,
    config: MultiplayerConfig,
    speed_ms: u32,
    tick: u64,
    match_record: Option<Match>,
}

impl MultiplayerGameState {
    pub fn new(config: MultiplayerConfig, rng: &mut GameRng) -> Self {
        let board = config.game.board();
        let rules = config.rules();
        let mut state = Self {
            phase: Phase::Idle,
            players: Self::initial_players(&config, &board),
            food: Vec::with_capacity(rules.food_count),
            board,
            rules,
            speed_ms: config.game.initial_speed_ms,
            config,
            tick: 0,
            match_record: None,
        };
        state.fill_food(rng);
        state
    }

    fn initial_players(config: &MultiplayerConfig, board: &Board) -> [PlayerEntity; 2] {
        let length = config.game.initial_length.max(1) as i32;
        let one_head = Position::new((board.width / 4).max(length - 1), board.height / 3);
        let two_head = Position::new(
            (board.width * 3 / 4 - 1).min(board.width - length),
            board.height * 2 / 3,
        );
        [
            PlayerEntity::new(
                PlayerSlot::One,
                Snake::new(one_head, Direction::Right, config.game.initial_length),
            ),
            PlayerEntity::new(
                PlayerSlot::Two,
                Snake::new(two_head, Direction::Left, config.game.initial_length),
            ),
        ]
    }

    fn fill_food(&mut self, rng: &mut GameRng) {
        while self.food.len() < self.rules.food_count {
            let owner = if self.rules.shared_food {
                None
            } else {
                Some(PlayerSlot::BOTH[self.food.len() % 2])
            };
            let position = FoodSpawner::spawn_position(&self.occupied_cells(), &self.board, rng);
            self.food.push(Food {
                position,
                value: self.config.game.food_value,
                owner,
            });
        }
    }

    fn occupied_cells(&self) -> HashSet<Position> {
        let mut occupied: HashSet<Position> = self.food.iter().map(|f| f.position).collect();
        for player in self.players.iter().filter(|p| p.is_alive()) {
            occupied.extend(player.snake.body().iter().copied());
        }
        occupied
    }

    pub fn toggle_ready(&mut self, slot: PlayerSlot) -> Result<bool, String> {
        if self.phase != Phase::Idle {
            return Err("Ready state can only change before the match starts".to_string());
        }
        let player = self.player_mut(slot);
        player.ready = !player.ready;
        Ok(player.ready)
    }

    pub fn start(&mut self, rng: &mut GameRng, events: &mut impl EventSink) -> Result<(), String> {
        if self.phase != Phase::Idle {
            return Err(format!("Cannot start a match from {:?}", self.phase));
        }
        if let Some(waiting) = self.players.iter().find(|p| !p.ready) {
            return Err(format!("{} is not ready", waiting.slot));
        }

        let match_id = MatchId::new(rng.match_id());
        log!("Match {} started in {:?} mode", match_id, self.config.mode);
        self.match_record = Some(Match::begin(match_id.clone()));
        events.emit(GameEvent::MatchStarted { match_id });
        self.set_phase(Phase::Playing, events);
        Ok(())
    }

    pub fn reset(&mut self, rng: &mut GameRng, events: &mut impl EventSink) {
        self.players = Self::initial_players(&self.config, &self.board);
        self.speed_ms = self.config.game.initial_speed_ms;
        self.tick = 0;
        self.match_record = None;
        self.food.clear();
        self.fill_food(rng);
        self.set_phase(Phase::Idle, events);
    }

    pub fn change_direction(&mut self, slot: PlayerSlot, direction: Direction) -> bool {
        if self.phase == Phase::GameOver {
            return false;
        }
        let player = self.player_mut(slot);
        player.is_alive() && player.snake.request_direction(direction)
    }

    pub fn pause(&mut self, events: &mut impl EventSink) {
        if self.phase == Phase::Playing {
            self.set_phase(Phase::Paused, events);
        }
    }

    pub fn resume(&mut self, events: &mut impl EventSink) {
        if self.phase == Phase::Paused {
            self.set_phase(Phase::Playing, events);
        }
    }

    pub fn toggle_pause(&mut self, events: &mut impl EventSink) {
        match self.phase {
            Phase::Playing => self.pause(events),
            Phase::Paused => self.resume(events),
            Phase::Idle | Phase::GameOver => {}
        }
    }

    pub fn concede(&mut self, slot: PlayerSlot, events: &mut impl EventSink) -> Result<(), String> {
        if !self.phase.is_running() {
            return Err("No match in progress".to_string());
        }
        log!("{} conceded", slot);
        self.end_match(Some(slot.other()), EndReason::Conceded, events);
        Ok(())
    }

    pub fn tick(&mut self, rng: &mut GameRng, events: &mut impl EventSink) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        self.tick += 1;

        let plans = self.plan_moves();
        let interval = self.speed_ms;

        let mut eliminated = Vec::new();
        for plan in plans.iter().flatten() {
            if let Some(reason) = plan.death {
                self.eliminate(plan.slot, reason, plan.candidate, events);
                eliminated.push(plan.slot);
            }
        }

        let movers: Vec<PlannedMove> = plans.iter().flatten().filter(|p| p.death.is_none()).copied().collect();
        for (index, plan) in movers.iter().enumerate() {
            let pending: Vec<Position> = movers[index + 1..].iter().map(|p| p.candidate).collect();
            if self.apply_move(plan.slot, plan.candidate, &pending, interval, rng, events) {
                return true;
            }
        }

        if !eliminated.is_empty() {
            self.evaluate_eliminations(&eliminated, events);
        }
        true
    }

    fn plan_moves(&self) -> [Option<PlannedMove>; 2] {
        let mut plans = [None, None];
        for player in self.players.iter().filter(|p| p.is_alive()) {
            let candidate = player.snake.next_head();
            let death = if is_wall_collision(candidate, &self.board) {
                Some(DeathReason::WallCollision)
            } else if is_self_collision(candidate, player.snake.body()) {
                Some(DeathReason::SelfCollision)
            } else {
                None
            };
            plans[player.slot.index()] = Some(PlannedMove {
                slot: player.slot,
                candidate,
                death,
            });
        }

        if !self.rules.allow_player_collision {
            return plans;
        }

        let [one, two] = &mut plans;
        if let (Some(one), Some(two)) = (one.as_mut(), two.as_mut())
            && one.candidate == two.candidate
        {
            one.death = one.death.or(Some(DeathReason::PlayerCollision));
            two.death = two.death.or(Some(DeathReason::PlayerCollision));
        }

        for plan in plans.iter_mut().flatten() {
            let other = &self.players[plan.slot.other().index()];
            if plan.death.is_none()
                && other.is_alive()
                && is_body_collision(plan.candidate, other.snake.body())
            {
                plan.death = Some(DeathReason::PlayerCollision);
            }
        }
        plans
    }

    fn eliminate(&mut self, slot: PlayerSlot, reason: DeathReason, position: Position, events: &mut impl EventSink) {
        let tick = self.tick;
        let player = self.player_mut(slot);
        player.death_reason = Some(reason);
        player.eliminated_at = Some(tick);
        events.emit(GameEvent::Collision {
            actor: Actor::Player(slot),
            reason,
            position,
        });
        events.emit(GameEvent::PlayerEliminated { slot, reason });
        log!("{} eliminated at {} ({:?})", slot, position, reason);
    }

    // `pending` holds the heads of players still to move this tick; new food avoids them.
    fn apply_move(
        &mut self,
        slot: PlayerSlot,
        candidate: Position,
        pending: &[Position],
        interval: u32,
        rng: &mut GameRng,
        events: &mut impl EventSink,
    ) -> bool {
        let eaten = self
            .food
            .iter()
            .position(|f| f.position == candidate && f.can_be_eaten_by(slot));

        let Some(index) = eaten else {
            let player = self.player_mut(slot);
            player.snake.advance(candidate, false);
            let length = player.snake.len();
            player.stats.record_move(interval, length);
            return false;
        };

        let food = self.food.swap_remove(index);
        let player = self.player_mut(slot);
        player.snake.advance(candidate, true);
        let length = player.snake.len();
        player.stats.record_food(food.value);
        player.stats.record_move(interval, length);
        events.emit(GameEvent::FoodConsumed {
            actor: Actor::Player(slot),
            position: candidate,
            value: food.value,
        });

        let mut occupied = self.occupied_cells();
        occupied.extend(pending.iter().copied());
        let position = FoodSpawner::spawn_position(&occupied, &self.board, rng);
        self.food.push(Food { position, ..food });
        self.update_speed(events);

        match self.score_victory() {
            Some((winner, reason)) => {
                self.end_match(winner, reason, events);
                true
            }
            None => false,
        }
    }

    fn score_victory(&self) -> Option<(Option<PlayerSlot>, EndReason)> {
        if let Some(limit) = self.rules.score_limit
            && let Some(leader) = self.players.iter().find(|p| p.stats.score >= limit)
        {
            return Some((Some(leader.slot), EndReason::ScoreLimitReached));
        }
        if let Some(target) = self.rules.combined_target
            && self.combined_score() >= target
        {
            return Some((None, EndReason::TargetScoreReached));
        }
        None
    }

    fn evaluate_eliminations(&mut self, eliminated: &[PlayerSlot], events: &mut impl EventSink) {
        let first_reason = eliminated
            .first()
            .and_then(|slot| self.players[slot.index()].death_reason)
            .map(EndReason::from);

        if self.rules.end_on_first_death {
            if let Some(reason) = first_reason {
                self.end_match(None, reason, events);
            }
            return;
        }

        let survivors: Vec<PlayerSlot> = self
            .players
            .iter()
            .filter(|p| p.is_alive())
            .map(|p| p.slot)
            .collect();

        match (self.config.mode, survivors.as_slice()) {
            (GameMode::Competitive, [survivor]) => {
                let reason = self.players[survivor.other().index()]
                    .death_reason
                    .map(EndReason::from)
                    .unwrap_or(EndReason::AllEliminated);
                self.end_match(Some(*survivor), reason, events);
            }
            (GameMode::Competitive, []) => {
                let [one, two] = &self.players;
                let winner = match one.stats.score.cmp(&two.stats.score) {
                    std::cmp::Ordering::Greater => Some(PlayerSlot::One),
                    std::cmp::Ordering::Less => Some(PlayerSlot::Two),
                    std::cmp::Ordering::Equal => None,
                };
                self.end_match(winner, EndReason::AllEliminated, events);
            }
            (_, []) => {
                // The last one to go down outlived the other.
                let winner = match eliminated {
                    [last] => Some(*last),
                    _ => None,
                };
                self.end_match(winner, EndReason::AllEliminated, events);
            }
            _ => {}
        }
    }

    fn end_match(&mut self, winner: Option<PlayerSlot>, reason: EndReason, events: &mut impl EventSink) {
        if let Some(record) = self.match_record.as_mut() {
            record.finish(winner, reason);
            log!(
                "Match {} ended: {:?}, winner {}",
                record.id,
                reason,
                winner.map(|w| w.to_string()).unwrap_or_else(|| "none".to_string())
            );
            events.emit(GameEvent::MatchEnded {
                match_id: record.id.clone(),
                winner,
                reason,
            });
        }
        self.set_phase(Phase::GameOver, events);
    }

    fn update_speed(&mut self, events: &mut impl EventSink) {
        let pace_score = match self.config.mode {
            GameMode::Cooperative => self.combined_score(),
            GameMode::Competitive | GameMode::Survival => {
                self.players.iter().map(|p| p.stats.score).max().unwrap_or(0)
            }
        };
        let speed = speed_for_score(pace_score, &self.config.game);
        if speed != self.speed_ms {
            self.speed_ms = speed;
            events.emit(GameEvent::SpeedChanged { interval_ms: speed });
        }
    }

    fn set_phase(&mut self, phase: Phase, events: &mut impl EventSink) {
        if self.phase != phase {
            events.emit(GameEvent::PhaseChanged {
                from: self.phase,
                to: phase,
            });
            self.phase = phase;
        }
    }

    fn player_mut(&mut self, slot: PlayerSlot) -> &mut PlayerEntity {
        &mut self.players[slot.index()]
    }

    pub fn player(&self, slot: PlayerSlot) -> &PlayerEntity {
        &self.players[slot.index()]
    }

    pub fn players(&self) -> &[PlayerEntity; 2] {
        &self.players
    }

    pub fn combined_score(&self) -> u32 {
        self.players.iter().map(|p| p.stats.score).sum()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    pub fn rules(&self) -> &ModeRules {
        &self.rules
    }

    pub fn food(&self) -> &[Food] {
        &self.food
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn speed_ms(&self) -> u32 {
        self.speed_ms
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn match_record(&self) -> Option<&Match> {
        self.match_record.as_ref()
    }

    pub fn snapshot(&self) -> MultiplayerSnapshot {
        MultiplayerSnapshot {
            phase: self.phase,
            mode: self.config.mode,
            players: self.players.clone().map(|p| PlayerSnapshot {
                slot: p.slot,
                body: p.snake.body().iter().copied().collect(),
                direction: p.snake.direction(),
                stats: p.stats,
                alive: p.is_alive(),
                ready: p.ready,
                death_reason: p.death_reason,
            }),
            food: self.food.clone(),
            speed_ms: self.speed_ms,
            tick: self.tick,
            match_record: self.match_record.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn set_snake(&mut self, slot: PlayerSlot, snake: Snake) {
        self.player_mut(slot).snake = snake;
    }

    #[cfg(test)]
    pub(crate) fn set_food(&mut self, food: Vec<Food>) {
        self.food = food;
    }
}
