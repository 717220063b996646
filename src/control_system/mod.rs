// control_system/mod.rs
pub mod controller;
pub mod phase;
pub mod policy;

pub use controller::SignalController;
pub use phase::{Action, Phase};
pub use policy::{ExternalPolicy, FixedCyclePolicy, PressureHeuristicPolicy, SignalPolicy};
