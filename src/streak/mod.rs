pub mod controller;
pub mod evaluator;

pub use controller::StreakController;
pub use evaluator::{evaluate, StreakUpdate};
