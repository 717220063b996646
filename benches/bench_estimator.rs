use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion,
    PlotConfiguration,
};

use crossflow::sensing::{DensityEstimator, LaneMap};
use crossflow::simulation_engine::engine::MicroSim;
use crossflow::simulation_engine::SimulationAccess;

/// Builds a simulation with `vehicle_count` scheduled departures, advanced
/// far enough that queues have formed on the red approaches.
fn congested_sim(vehicle_count: usize) -> MicroSim {
    let mut sim = MicroSim::four_arm(vehicle_count, 42);
    for _ in 0..60 {
        sim.advance();
    }
    sim
}

/// Benchmarks the per-tick density estimate (lane scan + noise draw) for
/// different traffic volumes (50, 100, and 200 vehicles).
fn bench_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("Density_Estimation_Benchmarks");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    for &count in [50, 100, 200].iter() {
        let sim = congested_sim(count);
        let lane_map = LaneMap::classify(sim.network()).unwrap();

        let noisy = DensityEstimator::new(lane_map.clone());
        group.bench_with_input(BenchmarkId::new("estimate", count), &count, |b, &_count| {
            b.iter(|| {
                let obs = noisy.estimate(black_box(&sim));
                black_box(obs);
            });
        });

        // The same scan without the Gaussian draw isolates the telemetry cost.
        let unnoised = DensityEstimator::new(lane_map).without_noise();
        group.bench_with_input(
            BenchmarkId::new("estimate_unnoised", count),
            &count,
            |b, &_count| {
                b.iter(|| {
                    let obs = unnoised.estimate(black_box(&sim));
                    black_box(obs);
                });
            },
        );
    }
    group.finish();
}

/// Benchmarks the one-time geometric approach classification.
fn bench_classify(c: &mut Criterion) {
    let sim = MicroSim::four_arm(0, 1);
    c.bench_function("classify_four_arm_topology", |b| {
        b.iter(|| {
            let map = LaneMap::classify(black_box(sim.network())).unwrap();
            black_box(map);
        });
    });
}

criterion_group!(benches, bench_estimate, bench_classify);
criterion_main!(benches);
