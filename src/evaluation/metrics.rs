use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::simulation_engine::{SimulationAccess, INTERNAL_EDGE_PREFIX};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetricsError {
    /// Finalizing before any tick was recorded.
    #[error("no ticks recorded, summary is undefined")]
    EmptyRun,
    /// A percentage improvement against a zero baseline has no value; this
    /// is reported as-is, never coerced to 0 or infinity.
    #[error("baseline {metric} is zero, improvement is undefined")]
    UndefinedImprovement { metric: &'static str },
}

/// Per-run accumulator, mutated once per tick and read out at run end.
/// Owned by exactly one evaluation run.
#[derive(Debug, Clone, Default)]
pub struct RunMetrics {
    total_waiting_time: f64,
    total_co2: f64,
    total_halted: u64,
    max_halted: u64,
    arrived: u64,
    ticks: u64,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples the simulation-wide measurements for the tick that just
    /// completed. Junction-internal edges are skipped by convention.
    pub fn record_tick<S: SimulationAccess>(&mut self, sim: &S) {
        let mut waiting = 0.0;
        let mut co2 = 0.0;
        let mut halted: u64 = 0;
        for edge_id in sim.edge_ids() {
            if edge_id.starts_with(INTERNAL_EDGE_PREFIX) {
                continue;
            }
            waiting += sim.edge_waiting_time(&edge_id);
            co2 += sim.edge_co2(&edge_id);
            halted += sim.edge_halted_count(&edge_id) as u64;
        }

        self.total_waiting_time += waiting;
        self.total_co2 += co2;
        self.total_halted += halted;
        self.max_halted = self.max_halted.max(halted);
        self.arrived += sim.arrived_count() as u64;
        self.ticks += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Derives the run summary from the accumulated totals.
    pub fn finalize(&self) -> Result<Summary, MetricsError> {
        if self.ticks == 0 {
            return Err(MetricsError::EmptyRun);
        }
        let ticks = self.ticks as f64;
        Ok(Summary {
            avg_wait: self.total_waiting_time / ticks,
            avg_queue: self.total_halted as f64 / ticks,
            total_co2: self.total_co2,
            max_queue: self.max_halted,
            throughput: self.arrived,
        })
    }
}

/// Final controller score for one episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Mean simulation-wide waiting seconds per tick.
    pub avg_wait: f64,
    /// Mean halted-vehicle count per tick.
    pub avg_queue: f64,
    /// Total CO2 mass emitted, in grams.
    pub total_co2: f64,
    /// Largest halted-vehicle count seen in any single tick.
    pub max_queue: u64,
    /// Vehicles that completed their trip.
    pub throughput: u64,
}

impl Summary {
    /// Plain metric-name/value pairs, the persisted wire format.
    pub fn as_pairs(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("avg_wait", self.avg_wait),
            ("avg_queue", self.avg_queue),
            ("total_co2", self.total_co2),
            ("max_queue", self.max_queue as f64),
            ("throughput", self.throughput as f64),
        ]
    }
}

/// Signed percentage improvements of a candidate run over a baseline run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    pub wait_improvement_pct: f64,
    pub queue_improvement_pct: f64,
    pub throughput_improvement_pct: f64,
}

impl Comparison {
    pub fn as_pairs(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("wait_improvement_pct", self.wait_improvement_pct),
            ("queue_improvement_pct", self.queue_improvement_pct),
            ("throughput_improvement_pct", self.throughput_improvement_pct),
        ]
    }
}

/// Scores a candidate against a baseline. Wait and queue improve when they
/// drop, throughput improves when it rises; the sign conventions are kept
/// separate on purpose.
pub fn compare(baseline: &Summary, candidate: &Summary) -> Result<Comparison, MetricsError> {
    let wait = lower_is_better(baseline.avg_wait, candidate.avg_wait, "avg_wait")?;
    let queue = lower_is_better(
        baseline.max_queue as f64,
        candidate.max_queue as f64,
        "max_queue",
    )?;
    let throughput = higher_is_better(
        baseline.throughput as f64,
        candidate.throughput as f64,
        "throughput",
    )?;
    Ok(Comparison {
        wait_improvement_pct: wait,
        queue_improvement_pct: queue,
        throughput_improvement_pct: throughput,
    })
}

fn lower_is_better(baseline: f64, candidate: f64, metric: &'static str) -> Result<f64, MetricsError> {
    if baseline == 0.0 {
        return Err(MetricsError::UndefinedImprovement { metric });
    }
    Ok((baseline - candidate) / baseline * 100.0)
}

fn higher_is_better(baseline: f64, candidate: f64, metric: &'static str) -> Result<f64, MetricsError> {
    if baseline == 0.0 {
        return Err(MetricsError::UndefinedImprovement { metric });
    }
    Ok((candidate - baseline) / baseline * 100.0)
}
