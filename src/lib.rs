pub mod api;
pub mod cli;
pub mod core;
pub mod directory;
pub mod graph;
pub mod scheduler;
