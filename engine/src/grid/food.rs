use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::rng::GameRng;
use crate::types::PlayerSlot;
use super::geometry::{Board, Position};

const SAMPLE_ATTEMPTS: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub position: Position,
    pub value: u32,
    pub owner: Option<PlayerSlot>,
}

impl Food {
    pub fn new(position: Position, value: u32) -> Self {
        Self {
            position,
            value,
            owner: None,
        }
    }

    pub fn owned_by(position: Position, value: u32, owner: PlayerSlot) -> Self {
        Self {
            position,
            value,
            owner: Some(owner),
        }
    }

    pub fn can_be_eaten_by(&self, slot: PlayerSlot) -> bool {
        self.owner.is_none_or(|owner| owner == slot)
    }
}

pub struct FoodSpawner;

impl FoodSpawner {
    // A full board yields `(0, 0)`.
    pub fn spawn_position(occupied: &HashSet<Position>, board: &Board, rng: &mut GameRng) -> Position {
        if board.width <= 0 || board.height <= 0 {
            return Position::ORIGIN;
        }

        for _ in 0..SAMPLE_ATTEMPTS {
            let pos = Position::new(
                rng.random_range(0..board.width),
                rng.random_range(0..board.height),
            );
            if !occupied.contains(&pos) {
                return pos;
            }
        }

        let free: Vec<Position> = board.cells().filter(|p| !occupied.contains(p)).collect();
        rng.pick(&free).copied().unwrap_or(Position::ORIGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_avoids_occupied() {
        let board = Board::new(5, 5);
        let mut rng = GameRng::new(42);
        let occupied: HashSet<Position> = board.cells().take(20).collect();
        for _ in 0..50 {
            let pos = FoodSpawner::spawn_position(&occupied, &board, &mut rng);
            assert!(board.contains(pos));
            assert!(!occupied.contains(&pos));
        }
    }

    #[test]
    fn test_spawn_single_free_cell() {
        let board = Board::new(4, 4);
        let mut rng = GameRng::new(42);
        let free = Position::new(3, 2);
        let occupied: HashSet<Position> = board.cells().filter(|p| *p != free).collect();
        assert_eq!(FoodSpawner::spawn_position(&occupied, &board, &mut rng), free);
    }

    #[test]
    fn test_spawn_full_board_falls_back_to_origin() {
        let board = Board::new(3, 3);
        let mut rng = GameRng::new(42);
        let occupied: HashSet<Position> = board.cells().collect();
        assert_eq!(FoodSpawner::spawn_position(&occupied, &board, &mut rng), Position::ORIGIN);
    }

    #[test]
    fn test_owned_food_eligibility() {
        let shared = Food::new(Position::new(1, 1), 10);
        let mine = Food::owned_by(Position::new(2, 2), 10, PlayerSlot::One);
        assert!(shared.can_be_eaten_by(PlayerSlot::Two));
        assert!(mine.can_be_eaten_by(PlayerSlot::One));
        assert!(!mine.can_be_eaten_by(PlayerSlot::Two));
    }
}
