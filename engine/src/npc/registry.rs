use std::collections::{BTreeMap, HashSet};

use crate::config::Validate;
use crate::grid::{Board, Direction, Position};
use crate::identifiers::NpcId;
use crate::log;
use crate::rng::GameRng;
use crate::snake::Snake;
use crate::types::DeathReason;
use super::types::{NpcConfig, NpcSnake, NpcState};

const SPAWN_ATTEMPTS: usize = 100;

#[derive(Clone, Debug, Default)]
pub struct NpcRegistry {
    npcs: BTreeMap<NpcId, NpcSnake>,
    next_id: u32,
}

impl NpcRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(
        &mut self,
        config: &NpcConfig,
        board: &Board,
        occupied: &HashSet<Position>,
        rng: &mut GameRng,
    ) -> Result<NpcId, String> {
        config.validate()?;

        let mut blocked = occupied.clone();
        blocked.extend(self.on_board_cells(None));

        let fits = |head: Position, direction: Direction| -> Option<Snake> {
            let snake = Snake::new(head, direction, config.initial_length);
            let ahead = head.step(direction);
            let clear = snake.fits_on(board)
                && snake.body().iter().all(|cell| !blocked.contains(cell))
                && board.contains(ahead)
                && !blocked.contains(&ahead);
            clear.then_some(snake)
        };

        let mut lane = None;
        for _ in 0..SPAWN_ATTEMPTS {
            let head = Position::new(
                rng.random_range(0..board.width),
                rng.random_range(0..board.height),
            );
            let direction = rng.pick(&Direction::ALL).copied().unwrap_or(Direction::Right);
            if let Some(snake) = fits(head, direction) {
                lane = Some(snake);
                break;
            }
        }
        if lane.is_none() {
            lane = board
                .cells()
                .flat_map(|head| Direction::ALL.into_iter().map(move |d| (head, d)))
                .find_map(|(head, direction)| fits(head, direction));
        }

        let snake = lane.ok_or_else(|| "No free lane left to spawn an NPC".to_string())?;
        let name = config.name.clone().unwrap_or_else(|| rng.snake_name());
        let id = self.insert(config, name, snake);
        log!("Spawned {} ({:?}, {:?})", id, config.personality, config.difficulty);
        Ok(id)
    }

    pub fn insert(&mut self, config: &NpcConfig, name: String, snake: Snake) -> NpcId {
        self.next_id += 1;
        let id = NpcId::new(self.next_id);
        self.npcs.insert(
            id,
            NpcSnake {
                id,
                name,
                snake,
                personality: config.personality,
                difficulty: config.difficulty,
                tuning: config.personality_config(),
                state: NpcState::Active,
                score: 0,
                food_eaten: 0,
                death_reason: None,
                last_decision: None,
            },
        );
        id
    }

    pub fn remove(&mut self, id: NpcId) -> Option<NpcSnake> {
        self.npcs.remove(&id)
    }

    pub fn get(&self, id: NpcId) -> Option<&NpcSnake> {
        self.npcs.get(&id)
    }

    pub fn get_mut(&mut self, id: NpcId) -> Option<&mut NpcSnake> {
        self.npcs.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NpcSnake> {
        self.npcs.values()
    }

    pub fn len(&self) -> usize {
        self.npcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.npcs.values().filter(|npc| npc.is_active()).count()
    }

    pub fn on_board_cells(&self, exclude: Option<NpcId>) -> HashSet<Position> {
        self.npcs
            .values()
            .filter(|npc| npc.is_on_board() && Some(npc.id) != exclude)
            .flat_map(|npc| npc.snake.body().iter().copied())
            .collect()
    }

    pub fn pause(&mut self, id: NpcId) -> Result<(), String> {
        self.transition(id, NpcState::Paused, &[NpcState::Active])
    }

    pub fn resume(&mut self, id: NpcId) -> Result<(), String> {
        self.transition(id, NpcState::Active, &[NpcState::Paused])
    }

    pub fn deactivate(&mut self, id: NpcId) -> Result<(), String> {
        self.transition(id, NpcState::Inactive, &[NpcState::Active, NpcState::Paused])
    }

    pub fn eliminate(&mut self, id: NpcId, reason: DeathReason) -> Result<(), String> {
        self.transition(id, NpcState::Eliminated, &[NpcState::Active, NpcState::Paused])?;
        if let Some(npc) = self.npcs.get_mut(&id) {
            npc.death_reason = Some(reason);
        }
        Ok(())
    }

    fn transition(&mut self, id: NpcId, to: NpcState, allowed_from: &[NpcState]) -> Result<(), String> {
        let npc = self
            .npcs
            .get_mut(&id)
            .ok_or_else(|| format!("Unknown NPC {}", id))?;
        if !allowed_from.contains(&npc.state) {
            return Err(format!("{} cannot go from {:?} to {:?}", id, npc.state, to));
        }
        npc.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::npc::{Difficulty, Personality};

    fn config() -> NpcConfig {
        NpcConfig::new(Personality::Balanced, Difficulty::Medium)
    }

    #[test]
    fn test_spawn_places_snake_on_free_cells() {
        let board = Board::new(20, 20);
        let mut registry = NpcRegistry::new();
        let mut rng = GameRng::new(42);
        let occupied: HashSet<Position> = (0..20).map(|x| Position::new(x, 10)).collect();

        let id = registry.spawn(&config(), &board, &occupied, &mut rng).unwrap();
        let npc = registry.get(id).unwrap();

        assert_eq!(npc.snake.len(), 3);
        assert!(npc.snake.fits_on(&board));
        assert!(npc.snake.body().iter().all(|cell| !occupied.contains(cell)));
        assert_eq!(npc.state, NpcState::Active);
        assert!(!npc.name.is_empty());
    }

    #[test]
    fn test_spawned_npcs_do_not_overlap() {
        let board = Board::new(10, 10);
        let mut registry = NpcRegistry::new();
        let mut rng = GameRng::new(7);
        for _ in 0..5 {
            registry.spawn(&config(), &board, &HashSet::new(), &mut rng).unwrap();
        }
        let total: usize = registry.iter().map(|npc| npc.snake.len()).sum();
        assert_eq!(registry.on_board_cells(None).len(), total);
    }

    #[test]
    fn test_spawn_scan_finds_last_lane() {
        // Only the top row is free; a horizontal lane still fits there.
        let board = Board::new(6, 6);
        let occupied: HashSet<Position> = board.cells().filter(|p| p.y > 0).collect();
        let mut registry = NpcRegistry::new();
        let mut rng = GameRng::new(3);

        let id = registry.spawn(&config(), &board, &occupied, &mut rng).unwrap();
        let npc = registry.get(id).unwrap();
        assert!(npc.snake.body().iter().all(|cell| cell.y == 0));
    }

    #[test]
    fn test_spawn_fails_without_room() {
        let board = Board::new(5, 5);
        let occupied: HashSet<Position> = board.cells().collect();
        let mut registry = NpcRegistry::new();
        let mut rng = GameRng::new(1);
        assert!(registry.spawn(&config(), &board, &occupied, &mut rng).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_spawn_rejects_invalid_config() {
        let board = Board::new(20, 20);
        let mut registry = NpcRegistry::new();
        let mut rng = GameRng::new(1);
        let bad = NpcConfig {
            initial_length: 0,
            ..config()
        };
        assert!(registry.spawn(&bad, &board, &HashSet::new(), &mut rng).is_err());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut registry = NpcRegistry::new();
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        let first = registry.insert(&config(), "a".to_string(), snake.clone());
        registry.remove(first);
        let second = registry.insert(&config(), "b".to_string(), snake);
        assert_ne!(first, second);
        assert!(second > first);
    }

    #[test]
    fn test_state_transitions() {
        let mut registry = NpcRegistry::new();
        let id = registry.insert(
            &config(),
            "a".to_string(),
            Snake::new(Position::new(5, 5), Direction::Right, 3),
        );

        registry.pause(id).unwrap();
        assert_eq!(registry.active_count(), 0);
        assert_eq!(registry.on_board_cells(None).len(), 3);
        assert!(registry.pause(id).is_err());

        registry.resume(id).unwrap();
        assert_eq!(registry.active_count(), 1);

        registry.eliminate(id, DeathReason::WallCollision).unwrap();
        let npc = registry.get(id).unwrap();
        assert_eq!(npc.state, NpcState::Eliminated);
        assert_eq!(npc.death_reason, Some(DeathReason::WallCollision));
        assert!(registry.on_board_cells(None).is_empty());
        assert!(registry.resume(id).is_err());
        assert!(registry.deactivate(id).is_err());
    }

    #[test]
    fn test_deactivate_takes_npc_off_board() {
        let mut registry = NpcRegistry::new();
        let id = registry.insert(
            &config(),
            "a".to_string(),
            Snake::new(Position::new(5, 5), Direction::Right, 3),
        );

        registry.deactivate(id).unwrap();

        assert_eq!(registry.get(id).unwrap().state, NpcState::Inactive);
        assert_eq!(registry.active_count(), 0);
        assert!(registry.on_board_cells(None).is_empty());
        assert!(registry.resume(id).is_err());
        assert!(registry.deactivate(id).is_err());
    }

    #[test]
    fn test_unknown_npc_is_an_error() {
        let mut registry = NpcRegistry::new();
        assert!(registry.pause(NpcId::new(9)).is_err());
    }

    #[test]
    fn test_on_board_cells_excludes_one() {
        let mut registry = NpcRegistry::new();
        let a = registry.insert(
            &config(),
            "a".to_string(),
            Snake::new(Position::new(5, 5), Direction::Right, 3),
        );
        registry.insert(
            &config(),
            "b".to_string(),
            Snake::new(Position::new(5, 8), Direction::Right, 3),
        );
        let cells = registry.on_board_cells(Some(a));
        assert_eq!(cells.len(), 3);
        assert!(!cells.contains(&Position::new(5, 5)));
    }
}
