use super::geometry::{Board, Position};

pub fn is_wall_collision(position: Position, board: &Board) -> bool {
    !board.contains(position)
}

// `body[0]` is the head and is never compared.
pub fn is_self_collision<'a, I>(head: Position, body: I) -> bool
where
    I: IntoIterator<Item = &'a Position>,
{
    body.into_iter().skip(1).any(|segment| *segment == head)
}

pub fn is_collision<'a, I>(head: Position, body: I, board: &Board) -> bool
where
    I: IntoIterator<Item = &'a Position>,
{
    is_wall_collision(head, board) || is_self_collision(head, body)
}

pub fn is_body_collision<'a, I>(head: Position, other_body: I) -> bool
where
    I: IntoIterator<Item = &'a Position>,
{
    other_body.into_iter().any(|segment| *segment == head)
}
