use std::collections::HashSet;

use crate::difficulty::speed_for_score;
use crate::events::{EventSink, GameEvent};
use crate::grid::{is_self_collision, is_wall_collision, Board, Direction, Food, FoodSpawner, Position};
use crate::log;
use crate::rng::GameRng;
use crate::settings::GameConfig;
use crate::snake::Snake;
use crate::types::{Actor, DeathReason, Phase, PlayerSlot, PlayerStats};

const PLAYER: Actor = Actor::Player(PlayerSlot::One);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    Start,
    Tick,
    ChangeDirection(Direction),
    Pause,
    Resume,
    TogglePause,
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Ignored,
    Moved,
    Ate { value: u32 },
    Collided(DeathReason),
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub body: Vec<Position>,
    pub direction: Direction,
    pub food: Food,
    pub score: u32,
    pub speed_ms: u32,
    pub stats: PlayerStats,
    pub board: Board,
}

#[derive(Clone, Debug)]
pub struct GameState {
    phase: Phase,
    snake: Snake,
    food: Food,
    speed_ms: u32,
    stats: PlayerStats,
    board: Board,
    config: GameConfig,
}

impl GameState {
    pub fn new(config: GameConfig, rng: &mut GameRng) -> Self {
        let board = config.board();
        let snake = Self::initial_snake(&config, &board);
        let mut state = Self {
            phase: Phase::Idle,
            food: Food::new(Position::ORIGIN, config.food_value),
            speed_ms: config.initial_speed_ms,
            stats: PlayerStats::new(snake.len()),
            snake,
            board,
            config,
        };
        state.respawn_food(&HashSet::new(), rng);
        state
    }

    fn initial_snake(config: &GameConfig, board: &Board) -> Snake {
        Snake::new(board.center(), Direction::Right, config.initial_length)
    }

    pub fn dispatch(&mut self, command: GameCommand, rng: &mut GameRng, events: &mut impl EventSink) {
        match command {
            GameCommand::Start => self.start(rng, events),
            GameCommand::Tick => {
                self.tick(rng, events);
            }
            GameCommand::ChangeDirection(direction) => {
                self.change_direction(direction);
            }
            GameCommand::Pause => self.pause(events),
            GameCommand::Resume => self.resume(events),
            GameCommand::TogglePause => self.toggle_pause(events),
            GameCommand::Reset => self.reset(rng, events),
        }
    }

    pub fn start(&mut self, rng: &mut GameRng, events: &mut impl EventSink) {
        match self.phase {
            Phase::Idle => self.set_phase(Phase::Playing, events),
            Phase::GameOver => {
                self.reset(rng, events);
                self.set_phase(Phase::Playing, events);
            }
            Phase::Playing | Phase::Paused => {}
        }
    }

    pub fn reset(&mut self, rng: &mut GameRng, events: &mut impl EventSink) {
        self.snake = Self::initial_snake(&self.config, &self.board);
        self.stats = PlayerStats::new(self.snake.len());
        self.speed_ms = self.config.initial_speed_ms;
        self.respawn_food(&HashSet::new(), rng);
        self.set_phase(Phase::Idle, events);
    }

    pub fn change_direction(&mut self, direction: Direction) -> bool {
        if self.phase == Phase::GameOver {
            return false;
        }
        self.snake.request_direction(direction)
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

    pub fn tick(&mut self, rng: &mut GameRng, events: &mut impl EventSink) -> TickOutcome {
        self.tick_with_obstacles(&HashSet::new(), rng, events)
    }

    pub fn tick_with_obstacles(
        &mut self,
        obstacles: &HashSet<Position>,
        rng: &mut GameRng,
        events: &mut impl EventSink,
    ) -> TickOutcome {
        if self.phase != Phase::Playing {
            return TickOutcome::Ignored;
        }

        let candidate = self.snake.next_head();
        if let Some(reason) = self.collision_reason(candidate, obstacles) {
            events.emit(GameEvent::Collision {
                actor: PLAYER,
                reason,
                position: candidate,
            });
            self.set_phase(Phase::GameOver, events);
            events.emit(GameEvent::GameOver {
                score: self.stats.score,
            });
            log!(
                "Game over at {} ({:?}), score {}, length {}",
                candidate,
                reason,
                self.stats.score,
                self.snake.len()
            );
            return TickOutcome::Collided(reason);
        }

        let interval = self.speed_ms;
        if candidate == self.food.position {
            self.snake.advance(candidate, true);
            let value = self.food.value;
            self.stats.record_food(value);
            self.stats.record_move(interval, self.snake.len());
            events.emit(GameEvent::FoodConsumed {
                actor: PLAYER,
                position: candidate,
                value,
            });

            let speed = speed_for_score(self.stats.score, &self.config);
            if speed != self.speed_ms {
                self.speed_ms = speed;
                events.emit(GameEvent::SpeedChanged { interval_ms: speed });
            }

            self.respawn_food(obstacles, rng);
            TickOutcome::Ate { value }
        } else {
            self.snake.advance(candidate, false);
            self.stats.record_move(interval, self.snake.len());
            TickOutcome::Moved
        }
    }

    fn collision_reason(&self, candidate: Position, obstacles: &HashSet<Position>) -> Option<DeathReason> {
        if is_wall_collision(candidate, &self.board) {
            Some(DeathReason::WallCollision)
        } else if is_self_collision(candidate, self.snake.body()) {
            Some(DeathReason::SelfCollision)
        } else if obstacles.contains(&candidate) {
            Some(DeathReason::NpcCollision)
        } else {
            None
        }
    }

    pub fn respawn_food(&mut self, extra_occupied: &HashSet<Position>, rng: &mut GameRng) {
        let mut occupied = extra_occupied.clone();
        occupied.extend(self.snake.body().iter().copied());
        let position = FoodSpawner::spawn_position(&occupied, &self.board, rng);
        self.food = Food::new(position, self.config.food_value);
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

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            body: self.snake.body().iter().copied().collect(),
            direction: self.snake.direction(),
            food: self.food,
            score: self.stats.score,
            speed_ms: self.speed_ms,
            stats: self.stats,
            board: self.board,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn score(&self) -> u32 {
        self.stats.score
    }

    pub fn speed_ms(&self) -> u32 {
        self.speed_ms
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn set_snake(&mut self, snake: Snake) {
        self.snake = snake;
    }

    #[cfg(test)]
    pub(crate) fn set_food(&mut self, food: Food) {
        self.food = food;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_state() -> (GameState, GameRng) {
        let mut rng = GameRng::new(42);
        let state = GameState::new(GameConfig::default(), &mut rng);
        (state, rng)
    }

    fn playing_state() -> (GameState, GameRng) {
        let (mut state, mut rng) = create_state();
        state.start(&mut rng, &mut ());
        (state, rng)
    }

    fn segments(cells: &[(i32, i32)]) -> Vec<Position> {
        cells.iter().map(|&(x, y)| Position::new(x, y)).collect()
    }

    #[test]
    fn test_new_is_idle_with_food_off_snake() {
        let (state, _) = create_state();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.snake().len(), 3);
        assert!(!state.snake().occupies(state.food().position));
        assert!(state.board().contains(state.food().position));
    }

    #[test]
    fn test_tick_ignored_when_idle() {
        let (mut state, mut rng) = create_state();
        let before = state.snapshot();
        assert_eq!(state.tick(&mut rng, &mut ()), TickOutcome::Ignored);
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_eating_food_grows_and_scores() {
        let (mut state, mut rng) = playing_state();
        state.set_snake(Snake::new(Position::new(10, 10), Direction::Right, 3));
        state.set_food(Food::new(Position::new(11, 10), 10));
        let mut events = Vec::new();

        let outcome = state.tick(&mut rng, &mut events);

        assert_eq!(outcome, TickOutcome::Ate { value: 10 });
        let body: Vec<Position> = state.snake().body().iter().copied().collect();
        assert_eq!(body, segments(&[(11, 10), (10, 10), (9, 10), (8, 10)]));
        assert_eq!(state.score(), 10);
        assert_eq!(state.stats().food_eaten, 1);
        assert_ne!(state.food().position, Position::new(11, 10));
        assert!(!state.snake().occupies(state.food().position));
        assert!(events.contains(&GameEvent::FoodConsumed {
            actor: PLAYER,
            position: Position::new(11, 10),
            value: 10,
        }));
    }

    #[test]
    fn test_plain_move_keeps_length_and_vacates_tail() {
        let (mut state, mut rng) = playing_state();
        state.set_snake(Snake::new(Position::new(10, 10), Direction::Right, 3));
        state.set_food(Food::new(Position::new(0, 0), 10));

        assert_eq!(state.tick(&mut rng, &mut ()), TickOutcome::Moved);
        assert_eq!(state.snake().len(), 3);
        assert!(!state.snake().occupies(Position::new(8, 10)));
        assert_eq!(state.score(), 0);
        assert_eq!(state.stats().moves_made, 1);
        assert_eq!(state.stats().elapsed_ms, 150);
    }

    #[test]
    fn test_wall_collision_ends_game_unchanged() {
        let (mut state, mut rng) = playing_state();
        state.set_snake(Snake::new(Position::new(0, 5), Direction::Left, 1));
        let food = Food::new(Position::new(10, 10), 10);
        state.set_food(food);
        let mut events = Vec::new();

        let outcome = state.tick(&mut rng, &mut events);

        assert_eq!(outcome, TickOutcome::Collided(DeathReason::WallCollision));
        assert_eq!(state.phase(), Phase::GameOver);
        let body: Vec<Position> = state.snake().body().iter().copied().collect();
        assert_eq!(body, segments(&[(0, 5)]));
        assert_eq!(state.food(), &food);
        assert!(events.contains(&GameEvent::GameOver { score: 0 }));
    }

    #[test]
    fn test_self_collision_ends_game() {
        let (mut state, mut rng) = playing_state();
        let snake = Snake::from_segments(
            segments(&[(5, 5), (5, 6), (4, 6), (4, 5), (4, 4)]),
            Direction::Up,
        )
        .unwrap();
        state.set_snake(snake);
        state.change_direction(Direction::Left);

        let outcome = state.tick(&mut rng, &mut ());
        assert_eq!(outcome, TickOutcome::Collided(DeathReason::SelfCollision));
        assert_eq!(state.phase(), Phase::GameOver);
    }

    #[test]
    fn test_obstacle_collision() {
        let (mut state, mut rng) = playing_state();
        state.set_snake(Snake::new(Position::new(10, 10), Direction::Right, 3));
        let obstacles: HashSet<Position> = [Position::new(11, 10)].into_iter().collect();
        let outcome = state.tick_with_obstacles(&obstacles, &mut rng, &mut ());
        assert_eq!(outcome, TickOutcome::Collided(DeathReason::NpcCollision));
    }

    #[test]
    fn test_reverse_direction_rejected() {
        let (mut state, mut rng) = playing_state();
        assert!(!state.change_direction(Direction::Left));
        assert_eq!(state.snake().next_direction(), Direction::Right);
        assert!(state.change_direction(Direction::Up));
        state.tick(&mut rng, &mut ());
        assert_eq!(state.snake().direction(), Direction::Up);
    }

    #[test]
    fn test_pause_blocks_ticks() {
        let (mut state, mut rng) = playing_state();
        state.pause(&mut ());
        assert!(state.is_paused());
        let head = state.snake().head();
        assert_eq!(state.tick(&mut rng, &mut ()), TickOutcome::Ignored);
        assert_eq!(state.snake().head(), head);
        state.toggle_pause(&mut ());
        assert_eq!(state.phase(), Phase::Playing);
    }

    #[test]
    fn test_pause_ignored_when_idle_or_over() {
        let (mut state, mut rng) = create_state();
        state.pause(&mut ());
        assert_eq!(state.phase(), Phase::Idle);

        state.start(&mut rng, &mut ());
        state.set_snake(Snake::new(Position::new(0, 0), Direction::Up, 1));
        state.tick(&mut rng, &mut ());
        assert_eq!(state.phase(), Phase::GameOver);
        state.toggle_pause(&mut ());
        assert_eq!(state.phase(), Phase::GameOver);
    }

    #[test]
    fn test_start_from_game_over_resets() {
        let (mut state, mut rng) = playing_state();
        state.set_snake(Snake::new(Position::new(0, 0), Direction::Up, 1));
        state.tick(&mut rng, &mut ());
        assert_eq!(state.phase(), Phase::GameOver);

        state.start(&mut rng, &mut ());
        assert_eq!(state.phase(), Phase::Playing);
        assert_eq!(state.snake().len(), 3);
        assert_eq!(state.snake().head(), state.board().center());
    }

    #[test]
    fn test_reset_twice_yields_same_initial_state() {
        let (mut state, mut rng) = playing_state();
        state.tick(&mut rng, &mut ());

        state.reset(&mut rng, &mut ());
        let first = state.snapshot();
        state.reset(&mut rng, &mut ());
        let second = state.snapshot();

        assert_eq!(first.phase, Phase::Idle);
        assert_eq!(first.body, second.body);
        assert_eq!(first.score, second.score);
        assert_eq!(first.speed_ms, second.speed_ms);
        assert_eq!(first.stats, second.stats);
        assert!(!second.body.contains(&second.food.position));
    }

    #[test]
    fn test_speed_drops_after_level() {
        let (mut state, mut rng) = playing_state();
        let mut events = Vec::new();
        for step in 0..5 {
            let head = state.snake().head();
            state.set_food(Food::new(Position::new(head.x + 1, head.y), 10));
            assert_eq!(state.tick(&mut rng, &mut events), TickOutcome::Ate { value: 10 }, "step {}", step);
        }
        assert_eq!(state.score(), 50);
        assert_eq!(state.speed_ms(), 140);
        assert!(events.contains(&GameEvent::SpeedChanged { interval_ms: 140 }));
    }

    #[test]
    fn test_dispatch_routes_commands() {
        let (mut state, mut rng) = create_state();
        let mut events = Vec::new();
        state.dispatch(GameCommand::Start, &mut rng, &mut events);
        state.dispatch(GameCommand::ChangeDirection(Direction::Down), &mut rng, &mut events);
        state.dispatch(GameCommand::Tick, &mut rng, &mut events);
        assert_eq!(state.snake().direction(), Direction::Down);
        state.dispatch(GameCommand::TogglePause, &mut rng, &mut events);
        assert_eq!(state.phase(), Phase::Paused);
        state.dispatch(GameCommand::Resume, &mut rng, &mut events);
        state.dispatch(GameCommand::Reset, &mut rng, &mut events);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(
            events.first(),
            Some(&GameEvent::PhaseChanged { from: Phase::Idle, to: Phase::Playing })
        );
    }
}
