use thiserror::Error;

/// Edges inside the junction carry this reserved prefix and are excluded
/// from metric aggregation.
pub const INTERNAL_EDGE_PREFIX: &str = ":";

/// A telemetry query failed in a way the caller can recover from.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// The vehicle left the simulation between enumeration and query.
    #[error("vehicle {0} left the simulation mid-query")]
    VehicleGone(String),
    /// The lane is unknown or momentarily unreadable.
    #[error("lane {0} is not available")]
    LaneUnavailable(String),
}

/// A signal command was rejected by the simulation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("no traffic signal at junction {0}")]
    NoSignal(String),
    #[error("signal {signal_id} has no phase index {index}")]
    InvalidPhase { signal_id: String, index: usize },
}

/// Per-tick query and command surface of the traffic micro-simulation.
///
/// All queries are read-only; `set_phase` is the only mutation besides
/// `advance`, and callers issue it at most once per tick after observing.
pub trait SimulationAccess {
    /// Length of a lane in simulation length-units.
    fn lane_length(&self, lane_id: &str) -> Result<f64, TelemetryError>;

    /// Ids of the vehicles currently on a lane.
    fn vehicles_on_lane(&self, lane_id: &str) -> Result<Vec<String>, TelemetryError>;

    /// Position of a vehicle along its current lane, measured from the
    /// lane start. May fail with `VehicleGone` between enumeration and query.
    fn vehicle_lane_position(&self, vehicle_id: &str) -> Result<f64, TelemetryError>;

    /// All edge ids, junction-internal edges included.
    fn edge_ids(&self) -> Vec<String>;

    /// Waiting seconds accrued on an edge this tick.
    fn edge_waiting_time(&self, edge_id: &str) -> f64;

    /// CO2 emitted on an edge this tick, in grams.
    fn edge_co2(&self, edge_id: &str) -> f64;

    /// Number of halted vehicles on an edge this tick.
    fn edge_halted_count(&self, edge_id: &str) -> usize;

    /// Vehicles that reached their destination during the last tick.
    fn arrived_count(&self) -> usize;

    /// Vehicles still in or yet to enter the simulation. Zero means the
    /// episode has drained.
    fn min_expected(&self) -> usize;

    /// Ids of the signal-controlled junctions.
    fn signal_ids(&self) -> Vec<String>;

    /// Current phase index of a signal.
    fn phase(&self, signal_id: &str) -> Result<usize, ControlError>;

    /// Switch a signal to the given phase index, effective immediately.
    fn set_phase(&mut self, signal_id: &str, phase_index: usize) -> Result<(), ControlError>;

    /// Advance the world by exactly one tick.
    fn advance(&mut self);
}
