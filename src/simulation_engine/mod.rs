// simulation_engine/mod.rs
pub mod engine;
pub mod interface;
pub mod network;
pub mod vehicles;

pub use interface::{ControlError, SimulationAccess, TelemetryError, INTERNAL_EDGE_PREFIX};
