// Shared primitives used by both the engine and the game layers

pub mod body;
pub mod color;
pub mod math;

pub use body::{BodyPart, Direction};
pub use color::Color;
