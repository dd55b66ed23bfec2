mod cost;
mod dynamics;
mod strategy;

pub use cost::{CostApproximation, QuadraticCost};
pub use dynamics::{GameDimensions, LinearDynamics};
pub use strategy::Strategy;

/// Players are identified by their position in the game's player list.
pub type PlayerId = usize;
