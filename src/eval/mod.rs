pub mod config;
pub mod evaluator;
pub mod ticker;
