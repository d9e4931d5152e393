use std::sync::Arc;

use chrono::{Offset, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use timetick_core::{AutoDateLocator, AxisContext, ConciseDateFormatter, TickFormatter, TickLocator};

fn bench_auto_locator(c: &mut Criterion) {
    let ctx = Arc::new(AxisContext::with_defaults());
    let locator = AutoDateLocator::new(ctx.clone(), Utc.fix(), true);
    let mut group = c.benchmark_group("auto_locator");
    // spans in days: two years, a quarter, 36 hours, 90 seconds
    for &span in &[730.0f64, 90.0, 1.5, 90.0 / 86_400.0] {
        group.bench_with_input(BenchmarkId::from_parameter(span), &span, |b, &span| {
            b.iter(|| {
                let plan = locator.plan(10_000.0, 10_000.0 + span).unwrap();
                black_box(plan.positions.len())
            });
        });
    }
    group.finish();
}

fn bench_concise_labels(c: &mut Criterion) {
    let ctx = Arc::new(AxisContext::with_defaults());
    let locator = AutoDateLocator::new(ctx.clone(), Utc.fix(), true);
    let formatter = ConciseDateFormatter::new(ctx.clone(), Utc.fix());
    let plan = locator.plan(10_000.0, 10_090.0).unwrap();
    c.bench_function("concise_labels_90d", |b| {
        b.iter(|| black_box(formatter.format_ticks(&plan).unwrap()));
    });
}

criterion_group!(benches, bench_auto_locator, bench_concise_labels);
criterion_main!(benches);
