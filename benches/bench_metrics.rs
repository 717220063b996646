use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion,
    PlotConfiguration,
};

use crossflow::evaluation::{compare, RunMetrics, Summary};
use crossflow::simulation_engine::engine::MicroSim;
use crossflow::simulation_engine::SimulationAccess;

/// Benchmarks the per-tick edge scan and accumulation for different traffic
/// volumes (50, 100, and 200 vehicles).
fn bench_record_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("Metrics_Aggregation_Benchmarks");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    for &count in [50, 100, 200].iter() {
        let mut sim = MicroSim::four_arm(count, 42);
        for _ in 0..60 {
            sim.advance();
        }
        group.bench_with_input(BenchmarkId::new("record_tick", count), &count, |b, &_count| {
            let mut metrics = RunMetrics::new();
            b.iter(|| {
                metrics.record_tick(black_box(&sim));
            });
        });
    }
    group.finish();
}

fn bench_compare(c: &mut Criterion) {
    let baseline = Summary {
        avg_wait: 14.2,
        avg_queue: 6.1,
        total_co2: 9_800.0,
        max_queue: 31,
        throughput: 280,
    };
    let candidate = Summary {
        avg_wait: 9.7,
        avg_queue: 4.3,
        total_co2: 8_650.0,
        max_queue: 22,
        throughput: 295,
    };
    c.bench_function("compare_summaries", |b| {
        b.iter(|| {
            let comparison = compare(black_box(&baseline), black_box(&candidate)).unwrap();
            black_box(comparison);
        });
    });
}

criterion_group!(benches, bench_record_tick, bench_compare);
criterion_main!(benches);
