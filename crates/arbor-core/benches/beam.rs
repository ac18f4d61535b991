//! Adaptive beam search benchmarks.
//!
//! Measures a full search over a synthetic integer space for:
//! - Different initial widths
//! - Diversity off vs. seeded jitter
//! - Arena growth and release under long runs

use arbor_core::search::{AdaptiveBeamSearch, BeamConfig, JitterDiversity};
use arbor_core::Result;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Branching factor of the synthetic expander.
const FANOUT: u64 = 8;

fn expand(state: &u64) -> Result<Vec<u64>> {
    Ok((1..=FANOUT).map(|i| state.wrapping_mul(31).wrapping_add(i)).collect())
}

/// Pseudo-random score in `[0, 1)` derived from the state.
fn score(state: &u64) -> Result<f64> {
    let mixed = state.wrapping_mul(0x9E37_79B9_7F4A_7C15) >> 11;
    Ok(mixed as f64 / (1u64 << 53) as f64)
}

fn config(width: usize, steps: usize) -> BeamConfig {
    BeamConfig {
        initial_width: width,
        min_width: 1,
        max_width: width * 2,
        max_steps: steps,
        ..Default::default()
    }
}

fn bench_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("beam_width");

    for width in [2usize, 4, 8, 16] {
        group.throughput(Throughput::Elements((width as u64) * FANOUT * 10));
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            let mut search = AdaptiveBeamSearch::new(config(width, 10)).unwrap();
            b.iter(|| black_box(search.search(black_box(1u64), &score, &expand).unwrap()))
        });
    }

    group.finish();
}

fn bench_diversity(c: &mut Criterion) {
    let mut group = c.benchmark_group("beam_diversity");

    group.bench_function("none", |b| {
        let mut search = AdaptiveBeamSearch::new(config(8, 10)).unwrap();
        b.iter(|| black_box(search.search(1u64, &score, &expand).unwrap()))
    });
    group.bench_function("jitter", |b| {
        let mut search = AdaptiveBeamSearch::with_diversity(config(8, 10), JitterDiversity::new(7)).unwrap();
        b.iter(|| black_box(search.search(1u64, &score, &expand).unwrap()))
    });

    group.finish();
}

fn bench_long_runs(c: &mut Criterion) {
    let mut group = c.benchmark_group("beam_steps");

    for steps in [10usize, 50, 200] {
        group.bench_with_input(BenchmarkId::from_parameter(steps), &steps, |b, &steps| {
            let mut search = AdaptiveBeamSearch::new(config(4, steps)).unwrap();
            b.iter(|| black_box(search.search(1u64, &score, &expand).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_width, bench_diversity, bench_long_runs);
criterion_main!(benches);
