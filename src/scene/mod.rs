pub mod anchor;
pub mod graph;
pub mod mask;
pub mod model;
pub mod transform;
