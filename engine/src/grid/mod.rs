mod collision;
mod food;
mod geometry;

pub use collision::{is_body_collision, is_collision, is_self_collision, is_wall_collision};
pub use food::{Food, FoodSpawner};
pub use geometry::{Board, Direction, Position};
