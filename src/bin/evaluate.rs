// evaluate.rs
//
// Runs the fixed-cycle baseline and the pressure-heuristic controller on
// identically seeded traffic, prints the comparison table, and persists the
// run summaries (CSV) and the comparison (JSON).

use crossflow::control_system::{FixedCyclePolicy, PressureHeuristicPolicy, SignalPolicy};
use crossflow::evaluation::report::{log_summary, write_comparison_json};
use crossflow::evaluation::{compare, run_episode, EpisodeConfig, MetricsError, Summary};
use crossflow::sensing::{DensityEstimator, LaneMap};
use crossflow::simulation_engine::engine::MicroSim;

const VEHICLE_COUNT: usize = 300;
const SEED: u64 = 42;
const SUMMARY_CSV: &str = "summaries.csv";
const COMPARISON_JSON: &str = "comparison.json";

fn run_labelled(policy: &mut dyn SignalPolicy, label: &str) -> Option<Summary> {
    println!("Running {}...", label);
    let mut sim = MicroSim::four_arm(VEHICLE_COUNT, SEED);
    let lane_map = match LaneMap::classify(sim.network()) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("Setup error: {}", e);
            return None;
        }
    };
    let estimator = DensityEstimator::new(lane_map);

    match run_episode(&mut sim, &estimator, policy, &EpisodeConfig::default()) {
        Ok(summary) => {
            println!("{} finished.", label);
            println!("  Avg Wait:   {:.2}", summary.avg_wait);
            println!("  Max Queue:  {}", summary.max_queue);
            println!("  Throughput: {}", summary.throughput);
            log_summary(SUMMARY_CSV, label, &summary);
            Some(summary)
        }
        Err(e) => {
            eprintln!("{} failed: {}", label, e);
            None
        }
    }
}

fn main() {
    env_logger::init();

    let Some(baseline) = run_labelled(&mut FixedCyclePolicy::default(), "baseline") else {
        return;
    };
    let Some(candidate) = run_labelled(&mut PressureHeuristicPolicy::default(), "adaptive") else {
        return;
    };

    println!();
    println!("{}", "=".repeat(65));
    println!("                    EVALUATION RESULTS");
    println!("{}", "=".repeat(65));
    println!(
        "{:<20} | {:<12} | {:<12} | {:<12}",
        "Metric", "Baseline", "Adaptive", "Improvement"
    );
    println!("{}", "-".repeat(65));

    match compare(&baseline, &candidate) {
        Ok(comparison) => {
            println!(
                "{:<20} | {:<12.2} | {:<12.2} | {:+.2}%",
                "Avg Wait Time", baseline.avg_wait, candidate.avg_wait, comparison.wait_improvement_pct
            );
            println!(
                "{:<20} | {:<12} | {:<12} | {:+.2}%",
                "Max Queue Length", baseline.max_queue, candidate.max_queue, comparison.queue_improvement_pct
            );
            println!(
                "{:<20} | {:<12} | {:<12} | {:+.2}%",
                "Total Throughput", baseline.throughput, candidate.throughput, comparison.throughput_improvement_pct
            );
            println!("{}", "=".repeat(65));

            if let Err(e) = write_comparison_json(COMPARISON_JSON, &comparison) {
                eprintln!("Error writing comparison report: {}", e);
            } else {
                println!("Comparison written to {}", COMPARISON_JSON);
            }
        }
        Err(MetricsError::UndefinedImprovement { metric }) => {
            println!("Improvement undefined: baseline {} is zero", metric);
        }
        Err(e) => eprintln!("Comparison failed: {}", e),
    }
}
