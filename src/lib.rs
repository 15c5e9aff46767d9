pub mod danger;
pub mod debug;
pub mod grid;
pub mod pathfinding;
pub mod plans;
pub mod simulation;
pub mod strategy;
pub mod vec2;
pub mod world;

pub use danger::*;
pub use debug::*;
pub use grid::*;
pub use pathfinding::*;
pub use plans::*;
pub use simulation::*;
pub use strategy::*;
pub use vec2::*;
pub use world::*;
