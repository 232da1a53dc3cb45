pub mod github;
pub mod graph;
pub mod youtube;
