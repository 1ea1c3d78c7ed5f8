use snake_engine::grid::{is_body_collision, is_self_collision};
use snake_engine::{Board, Direction, Food, GameRng, Position, Snake};

pub struct Autopilot;

impl Autopilot {
    pub fn steer(snake: &Snake, blockers: &[&Snake], food: &[Food], board: &Board, rng: &mut GameRng) -> Direction {
        let head = snake.head();
        let safe: Vec<(Direction, Position)> = snake
            .direction()
            .non_reversing()
            .map(|direction| (direction, head.step(direction)))
            .filter(|&(_, next)| Self::is_safe(next, snake, blockers, board))
            .collect();

        if safe.is_empty() {
            return snake.direction();
        }

        let nearest = food
            .iter()
            .map(|f| f.position)
            .min_by_key(|p| head.manhattan_distance(*p));

        match nearest {
            Some(target) => safe
                .iter()
                .min_by_key(|(_, next)| next.manhattan_distance(target))
                .map(|&(direction, _)| direction)
                .unwrap_or(snake.direction()),
            None => rng
                .pick(&safe)
                .map(|&(direction, _)| direction)
                .unwrap_or(snake.direction()),
        }
    }

    fn is_safe(next: Position, snake: &Snake, blockers: &[&Snake], board: &Board) -> bool {
        board.contains(next)
            && !is_self_collision(next, snake.body())
            && !blockers.iter().any(|other| is_body_collision(next, other.body()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake(cells: &[(i32, i32)], direction: Direction) -> Snake {
        Snake::from_segments(cells.iter().map(|&(x, y)| Position::new(x, y)), direction).unwrap()
    }

    #[test]
    fn test_steers_towards_food() {
        let mut rng = GameRng::new(42);
        let own = snake(&[(5, 5), (4, 5), (3, 5)], Direction::Right);
        let food = [Food::new(Position::new(5, 15), 10)];
        let direction = Autopilot::steer(&own, &[], &food, &Board::new(20, 20), &mut rng);
        assert_eq!(direction, Direction::Down);
    }

    #[test]
    fn test_avoids_walls() {
        let mut rng = GameRng::new(42);
        let own = snake(&[(19, 5), (18, 5), (17, 5)], Direction::Right);
        let food = [Food::new(Position::new(19, 0), 10)];
        let direction = Autopilot::steer(&own, &[], &food, &Board::new(20, 20), &mut rng);
        assert_eq!(direction, Direction::Up);
    }

    #[test]
    fn test_avoids_other_snakes() {
        let mut rng = GameRng::new(42);
        let own = snake(&[(5, 5), (4, 5), (3, 5)], Direction::Right);
        let other = snake(&[(6, 4), (6, 5), (6, 6)], Direction::Up);
        let food = [Food::new(Position::new(10, 5), 10)];
        let direction = Autopilot::steer(&own, &[&other], &food, &Board::new(20, 20), &mut rng);
        assert_ne!(direction, Direction::Right);
    }

    #[test]
    fn test_keeps_heading_when_trapped() {
        let mut rng = GameRng::new(42);
        let own = snake(&[(0, 0), (1, 0), (2, 0)], Direction::Left);
        let other = snake(&[(0, 1), (1, 1), (2, 1)], Direction::Left);
        let direction = Autopilot::steer(&own, &[&other], &[], &Board::new(20, 20), &mut rng);
        assert_eq!(direction, Direction::Left);
    }
}
