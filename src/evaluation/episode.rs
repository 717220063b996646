use crate::control_system::{SignalController, SignalPolicy};
use crate::evaluation::metrics::{MetricsError, RunMetrics, Summary};
use crate::sensing::DensityEstimator;
use crate::simulation_engine::SimulationAccess;

/// Bounds for one evaluation episode.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeConfig {
    /// Hard cap on ticks; the run also ends early once the simulation
    /// expects no further vehicles.
    pub max_ticks: u64,
    /// Consecutive degraded (signal-less) decisions tolerated before the
    /// run is cut short.
    pub degraded_tick_limit: u64,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            max_ticks: 2000,
            degraded_tick_limit: 25,
        }
    }
}

/// Drives one bounded episode: observe, decide, apply the phase, advance the
/// world, sample metrics; repeat until the traffic drains or the tick cap is
/// reached. Returns the finalized summary.
pub fn run_episode<S, P>(
    sim: &mut S,
    estimator: &DensityEstimator,
    policy: &mut P,
    config: &EpisodeConfig,
) -> Result<Summary, MetricsError>
where
    S: SimulationAccess,
    P: SignalPolicy + ?Sized,
{
    let mut controller = SignalController::new(sim);
    let mut metrics = RunMetrics::new();
    let mut degraded_ticks = 0u64;

    log::info!(
        "starting episode: policy={}, max_ticks={}",
        policy.name(),
        config.max_ticks
    );

    for tick in 0..config.max_ticks {
        if sim.min_expected() == 0 {
            log::info!("traffic drained after {tick} ticks");
            break;
        }

        let observation = estimator.estimate(sim);
        let (_action, _phase) = controller.decide(sim, policy, &observation);

        if controller.is_degraded() {
            degraded_ticks += 1;
            if degraded_ticks >= config.degraded_tick_limit {
                log::error!(
                    "signal unresponsive for {degraded_ticks} consecutive ticks, ending episode"
                );
                break;
            }
        } else {
            degraded_ticks = 0;
        }

        sim.advance();
        metrics.record_tick(sim);
    }

    let summary = metrics.finalize()?;
    log::info!(
        "episode finished after {} ticks: avg_wait={:.2}, max_queue={}, throughput={}",
        metrics.ticks(),
        summary.avg_wait,
        summary.max_queue,
        summary.throughput
    );
    Ok(summary)
}
