use std::collections::VecDeque;

use crate::grid::{Board, Direction, Position};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    next_direction: Direction,
}

impl Snake {
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = VecDeque::with_capacity(length.max(1));
        let behind = direction.opposite();
        let mut segment = head;
        body.push_back(segment);
        for _ in 1..length.max(1) {
            segment = segment.step(behind);
            body.push_back(segment);
        }

        Self {
            body,
            direction,
            next_direction: direction,
        }
    }

    pub fn from_segments<I>(segments: I, direction: Direction) -> Option<Self>
    where
        I: IntoIterator<Item = Position>,
    {
        let body: VecDeque<Position> = segments.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        Some(Self {
            body,
            direction,
            next_direction: direction,
        })
    }

    pub fn head(&self) -> Position {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn tail(&self) -> Position {
        *self.body.back().expect("Snake body should never be empty")
    }

    pub fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn next_direction(&self) -> Direction {
        self.next_direction
    }

    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    pub fn fits_on(&self, board: &Board) -> bool {
        self.body.iter().all(|p| board.contains(*p))
    }

    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if direction.is_opposite(self.direction) {
            return false;
        }
        self.next_direction = direction;
        true
    }

    pub fn next_head(&self) -> Position {
        self.head().step(self.next_direction)
    }

    pub fn advance(&mut self, new_head: Position, grow: bool) -> Option<Position> {
        self.direction = self.next_direction;
        self.body.push_front(new_head);
        if grow {
            None
        } else {
            self.body.pop_back()
        }
    }
}
