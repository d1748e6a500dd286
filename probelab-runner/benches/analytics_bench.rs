//! Criterion benchmarks for the ProbeLab analytics hot loops.
//!
//! Run with: `cargo bench -p probelab-runner`
//!
//! Benchmarks:
//! 1. Performance summary over record tapes of increasing length
//! 2. Risk scan (loss runs, daily extremes, curtailment walk)
//! 3. A full one-week session through the reference policy
//!
//! Note: multi-month sessions are not benchmarked here; at quarter scale the
//! stream build dominates and that path is covered by the core benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use probelab_core::domain::{ExecutionRecord, OpportunityId};
use probelab_runner::config::SessionConfig;
use probelab_runner::metrics::PerformanceSummary;
use probelab_runner::risk::{RiskConfig, RiskReport};
use probelab_runner::runner::run_session;

/// Deterministic synthetic tape: ~75% executed, mixed wins and losses.
fn generate_tape(count: usize) -> Vec<ExecutionRecord> {
    let open = NaiveDate::from_ymd_opt(2024, 3, 4)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    (0..count)
        .map(|i| {
            let executed = i % 4 != 0;
            let cents = if executed {
                (i as i64 * 37) % 141 - 70
            } else {
                0
            };
            ExecutionRecord {
                opportunity_id: OpportunityId(i as u64),
                timestamp: open + Duration::minutes(3 * i as i64),
                executed: executed && cents != 0,
                pnl: if executed { Decimal::new(cents, 2) } else { Decimal::ZERO },
            }
        })
        .collect()
}

fn bench_performance_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("performance_summary");

    for size in [100usize, 1_000, 10_000] {
        let tape = generate_tape(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &tape, |b, tape| {
            b.iter(|| PerformanceSummary::compute(black_box(tape)));
        });
    }

    group.finish();
}

fn bench_risk_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("risk_scan");
    let config = RiskConfig::default();

    for size in [100usize, 1_000, 10_000] {
        let tape = generate_tape(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &tape, |b, tape| {
            b.iter(|| RiskReport::compute(black_box(tape), &config));
        });
    }

    group.finish();
}

fn bench_week_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");
    group.sample_size(20);

    let config = SessionConfig::sample_week();

    group.bench_function("reference_week", |b| {
        b.iter(|| run_session(black_box(&config)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_performance_summary,
    bench_risk_scan,
    bench_week_session
);
criterion_main!(benches);
