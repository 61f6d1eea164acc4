pub mod color;
pub mod evaluator;
pub mod model;
pub mod stack;
