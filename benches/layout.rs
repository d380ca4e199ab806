use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sankey_layout::layout::{LayoutOptions, compute_layout, smooth_step};
use sankey_layout::parser::parse_pairs;
use std::hint::black_box;

/// Deterministic xorshift pairs over `labels` categories.
fn synthetic_pairs(count: usize, labels: usize) -> (Vec<u32>, Vec<u32>) {
    let labels = labels.max(1) as u64;
    let mut state = 0x2545_f491_4f6c_dd1d_u64;
    let mut before = Vec::with_capacity(count);
    let mut after = Vec::with_capacity(count);
    for _ in 0..count {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let from = (state % labels) as u32;
        // bias targets toward the source's neighbour
        let to = if state & 3 == 0 {
            ((from as u64 + 1) % labels) as u32
        } else {
            ((state >> 32) % labels) as u32
        };
        before.push(from);
        after.push(to);
    }
    (before, after)
}

fn pairs_source(count: usize, labels: usize) -> String {
    let (before, after) = synthetic_pairs(count, labels);
    let mut out = String::from("sankey-pairs\n");
    for (from, to) in before.iter().zip(&after) {
        out.push_str(&format!("state-{from},state-{to}\n"));
    }
    out
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for &(count, labels) in &[(100usize, 4usize), (10_000, 8), (100_000, 24)] {
        let (before, after) = synthetic_pairs(count, labels);
        let options = LayoutOptions::default();
        group.bench_with_input(
            BenchmarkId::new("compute", format!("{count}x{labels}")),
            &(before, after),
            |b, (before, after)| {
                b.iter(|| {
                    compute_layout(
                        black_box(before.as_slice()),
                        black_box(after.as_slice()),
                        &options,
                    )
                    .unwrap()
                })
            },
        );
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let source = pairs_source(10_000, 12);
    c.bench_function("parse_pairs_10k", |b| {
        b.iter(|| parse_pairs(black_box(&source)).unwrap())
    });
}

fn bench_smoothing(c: &mut Criterion) {
    c.bench_function("smooth_step", |b| {
        b.iter(|| smooth_step(black_box(1.5), black_box(42.0)))
    });
}

criterion_group!(benches, bench_layout, bench_parse, bench_smoothing);
criterion_main!(benches);
