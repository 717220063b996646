use crossflow::control_system::PressureHeuristicPolicy;
use crossflow::evaluation::{run_episode, EpisodeConfig};
use crossflow::sensing::{DensityEstimator, LaneMap};
use crossflow::simulation_engine::engine::MicroSim;

fn main() {
    env_logger::init();
    println!("Starting adaptive signal control demo...");

    let mut sim = MicroSim::four_arm(150, 42);
    let lane_map = match LaneMap::classify(sim.network()) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("Setup error: {}", e);
            return;
        }
    };
    let estimator = DensityEstimator::new(lane_map);
    let mut policy = PressureHeuristicPolicy::default();

    match run_episode(&mut sim, &estimator, &mut policy, &EpisodeConfig::default()) {
        Ok(summary) => {
            println!("Episode complete after {} ticks.", sim.tick());
            for (name, value) in summary.as_pairs() {
                println!("  {:<12} {:.2}", name, value);
            }
        }
        Err(e) => eprintln!("Evaluation error: {}", e),
    }
}
