pub mod deterministic;
pub mod solver;
