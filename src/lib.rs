pub mod control_system;
pub mod evaluation;
pub mod sensing;
pub mod simulation_engine;
