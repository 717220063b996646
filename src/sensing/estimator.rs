use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

use crate::sensing::topology::{Approach, LaneMap};
use crate::simulation_engine::interface::{SimulationAccess, TelemetryError};

/// Radius from the stop line within which a vehicle counts as queued.
pub const DEFAULT_DETECTION_DISTANCE: f64 = 50.0;

/// Estimated per-approach densities for one tick, ordered North, South,
/// East, West. Built fresh on every estimate and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    values: [f64; 4],
}

impl Observation {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            values: [north, south, east, west],
        }
    }

    pub fn get(&self, approach: Approach) -> f64 {
        self.values[approach.index()]
    }

    pub fn north(&self) -> f64 {
        self.values[0]
    }

    pub fn south(&self) -> f64 {
        self.values[1]
    }

    pub fn east(&self) -> f64 {
        self.values[2]
    }

    pub fn west(&self) -> f64 {
        self.values[3]
    }

    /// Combined demand on the north-south green.
    pub fn ns_pressure(&self) -> f64 {
        self.north() + self.south()
    }

    /// Combined demand on the east-west green.
    pub fn ew_pressure(&self) -> f64 {
        self.east() + self.west()
    }

    pub fn values(&self) -> [f64; 4] {
        self.values
    }
}

/// Multiplicative-proportional sensor noise: a zero-mean Gaussian whose
/// standard deviation scales with the raw count.
#[derive(Debug, Clone, Copy)]
pub struct SensorNoise {
    /// Standard deviation as a fraction of the raw count.
    pub proportional_std: f64,
}

impl Default for SensorNoise {
    fn default() -> Self {
        Self {
            proportional_std: 0.05,
        }
    }
}

impl SensorNoise {
    /// Perturbs a raw count. A count of zero is returned untouched: the
    /// noise scale would be zero anyway, and skipping the draw keeps zero
    /// traffic reading exactly zero.
    pub fn perturb<R: Rng + ?Sized>(&self, count: f64, rng: &mut R) -> f64 {
        if count <= 0.0 {
            return count;
        }
        match Normal::new(0.0, self.proportional_std * count) {
            Ok(dist) => count + dist.sample(rng),
            Err(_) => count,
        }
    }
}

/// Converts raw per-vehicle simulation state into a noisy per-approach
/// density estimate. Holds no state between calls beyond the lane map.
#[derive(Debug, Clone)]
pub struct DensityEstimator {
    lane_map: LaneMap,
    detection_distance: f64,
    noise: Option<SensorNoise>,
}

impl DensityEstimator {
    pub fn new(lane_map: LaneMap) -> Self {
        Self {
            lane_map,
            detection_distance: DEFAULT_DETECTION_DISTANCE,
            noise: Some(SensorNoise::default()),
        }
    }

    pub fn with_detection_distance(mut self, distance: f64) -> Self {
        self.detection_distance = distance;
        self
    }

    /// Disables the noise model; estimates become the deterministic base
    /// counts.
    pub fn without_noise(mut self) -> Self {
        self.noise = None;
        self
    }

    pub fn lane_map(&self) -> &LaneMap {
        &self.lane_map
    }

    /// Fresh observation for the current simulation state.
    pub fn estimate<S: SimulationAccess>(&self, sim: &S) -> Observation {
        self.estimate_with(sim, &mut rand::rng())
    }

    /// Same as `estimate`, with an explicit noise source.
    pub fn estimate_with<S: SimulationAccess, R: Rng + ?Sized>(
        &self,
        sim: &S,
        rng: &mut R,
    ) -> Observation {
        let mut values = [0.0f64; 4];
        for approach in Approach::ALL {
            let mut count = self.raw_count(sim, approach) as f64;
            if let Some(noise) = &self.noise {
                count = noise.perturb(count, rng);
            }
            values[approach.index()] = round2(count.max(0.0));
        }
        Observation { values }
    }

    /// Unnoised vehicle count within detection distance of the stop line,
    /// summed over the approach's lanes. Vehicles that vanish between
    /// enumeration and the position query are excluded; an unreadable lane
    /// contributes zero.
    pub fn raw_count<S: SimulationAccess>(&self, sim: &S, approach: Approach) -> usize {
        let mut count = 0;
        for lane_id in self.lane_map.lanes(approach) {
            let length = match sim.lane_length(lane_id) {
                Ok(length) => length,
                Err(e) => {
                    log::warn!("lane {lane_id} unreadable, counting 0: {e}");
                    continue;
                }
            };
            let vehicle_ids = match sim.vehicles_on_lane(lane_id) {
                Ok(ids) => ids,
                Err(e) => {
                    log::warn!("lane {lane_id} unreadable, counting 0: {e}");
                    continue;
                }
            };
            for vehicle_id in &vehicle_ids {
                match sim.vehicle_lane_position(vehicle_id) {
                    Ok(pos) => {
                        if length - pos <= self.detection_distance {
                            count += 1;
                        }
                    }
                    // The vehicle left mid-query; just don't count it.
                    Err(TelemetryError::VehicleGone(_)) => {}
                    Err(e) => {
                        log::warn!("position query for {vehicle_id} failed: {e}");
                    }
                }
            }
        }
        count
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
