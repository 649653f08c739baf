use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use colflow_core::Block;
use colflow_distribute::{balanced_greedy, round_robin, DistributionEngine};

const KINDS: &[&str] = &["paragraph", "heading", "list", "image", "code"];

fn blocks(count: usize) -> Vec<Block> {
    (0..count)
        .map(|i| {
            Block::new(format!("b{i}"), KINDS[i % KINDS.len()])
                .with_text("lorem ipsum ".repeat(i % 20 + 1))
        })
        .collect()
}

fn heights(count: usize) -> Vec<f64> {
    (0..count).map(|i| (i % 13) as f64 * 24.0 + 40.0).collect()
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategies");
    for &size in &[100usize, 1000, 5000] {
        let hs = heights(size);
        group.bench_with_input(BenchmarkId::new("balanced_greedy", size), &hs, |b, hs| {
            b.iter(|| balanced_greedy(black_box(hs), 4));
        });
        group.bench_with_input(BenchmarkId::new("round_robin", size), &size, |b, &size| {
            b.iter(|| round_robin(black_box(size), 4));
        });
    }
    group.finish();
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    for &size in &[100usize, 1000, 5000] {
        let input = blocks(size);
        group.bench_with_input(BenchmarkId::new("distribute_cold", size), &input, |b, input| {
            b.iter_batched(
                DistributionEngine::new,
                |mut engine| engine.distribute(black_box(input), 4).unwrap(),
                criterion::BatchSize::SmallInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("distribute_warm", size), &input, |b, input| {
            let mut engine = DistributionEngine::new();
            engine.distribute(input, 4).unwrap();
            b.iter(|| engine.distribute(black_box(input), 4).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_strategies, bench_engine);
criterion_main!(benches);
