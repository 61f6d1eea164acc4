pub mod condition;
pub mod events;
pub mod machine;
pub mod runtime;
