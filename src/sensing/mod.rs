// sensing/mod.rs
pub mod estimator;
pub mod topology;

pub use estimator::{DensityEstimator, Observation, SensorNoise};
pub use topology::{Approach, ClassifyError, LaneMap};
