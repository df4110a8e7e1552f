pub mod paths;
pub mod simulation;
