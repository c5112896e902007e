//! Criterion benchmarks for the ACO engine.
//!
//! Uses random dense instances to measure construction, evaluation and
//! full-trial overhead at a few problem sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_antqap::aco::{AcoConfig, AcoRunner, AntPathGenerator, FitnessEvaluator, PheromoneTable};
use u_antqap::qap::QapInstance;
use u_numflow::random::create_rng;

// ===========================================================================
// Random instances
// ===========================================================================

fn random_instance(n: usize, seed: u64) -> QapInstance {
    let mut rng = create_rng(seed);
    let mut matrix = |max: i64| -> Vec<i64> {
        let mut data: Vec<i64> = (0..n * n).map(|_| rng.random_range(0..max)).collect();
        for i in 0..n {
            data[i * n + i] = 0;
        }
        data
    };
    let distance = matrix(100);
    let flow = matrix(20);
    QapInstance::new(n, distance, flow).expect("valid random instance")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_construct(c: &mut Criterion) {
    let mut group = c.benchmark_group("aco_construct");
    group.sample_size(20);

    for &n in &[12usize, 30, 50] {
        let table = PheromoneTable::random(n, &mut create_rng(1));
        for parallel in [false, true] {
            let generator = AntPathGenerator::new(parallel);
            let id = if parallel { "par" } else { "seq" };
            group.bench_with_input(BenchmarkId::new(id, n), &table, |b, t| {
                let mut rng = create_rng(42);
                b.iter(|| black_box(generator.generate(black_box(t), 50, &mut rng)))
            });
        }
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aco_evaluate");
    group.sample_size(20);

    for &n in &[12usize, 30, 50] {
        let instance = random_instance(n, 7);
        let table = PheromoneTable::random(n, &mut create_rng(2));
        let paths = AntPathGenerator::new(false).generate(&table, 50, &mut create_rng(3));
        group.bench_with_input(BenchmarkId::from_parameter(n), &paths, |b, p| {
            let evaluator = FitnessEvaluator::new(&instance);
            b.iter(|| black_box(evaluator.evaluate(black_box(p))))
        });
    }
    group.finish();
}

fn bench_trial(c: &mut Criterion) {
    let mut group = c.benchmark_group("aco_trial");
    group.sample_size(10);

    for &(n, ants, iterations) in &[(12usize, 10usize, 100usize), (30, 20, 50), (50, 20, 20)] {
        let instance = random_instance(n, 11);
        let config = AcoConfig::default()
            .with_ant_count(ants)
            .with_max_iterations(iterations)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(format!("n{}_m{}_i{}", n, ants, iterations), n),
            &(instance, config),
            |b, (inst, cfg)| {
                b.iter(|| {
                    let result = AcoRunner::run(black_box(inst), black_box(cfg));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_construct, bench_evaluate, bench_trial);
criterion_main!(benches);
