//! Benchmarks for flat blocklist aggregation.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::net::Ipv4Addr;

use trackip::aggregator::{aggregate_cidrs, merge_flat, render_flat, render_structured};
use trackip::sources::exodus::expand_host_pattern;
use trackip::sources::{ResolutionSummary, SourceReport, TrackerMap};

/// Build a report with `hosts` hosts spread over 100 trackers, 3 addresses each
fn generate_report(hosts: usize) -> SourceReport {
    let mut trackers = TrackerMap::new();
    for i in 0..hosts {
        let ips = (0..3u32)
            .map(|j| Ipv4Addr::from(0x5D00_0000u32.wrapping_add((i as u32) * 7 + j * 1_000_003)))
            .collect();
        trackers
            .entry(format!("Tracker {}", i % 100))
            .or_default()
            .insert(format!("host{}.example.com", i), ips);
    }
    SourceReport {
        name: "Bench",
        trackers,
        summary: ResolutionSummary::default(),
    }
}

fn bench_merge_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_flat");

    for size in [100, 1000, 5000] {
        let reports = vec![generate_report(size), generate_report(size / 2)];
        group.bench_with_input(BenchmarkId::new("two_sources", size), &reports, |b, reports| {
            b.iter(|| black_box(merge_flat(reports)));
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let report = generate_report(2000);
    let flat = merge_flat(std::slice::from_ref(&report));

    group.bench_function("flat_2000", |b| {
        b.iter(|| black_box(render_flat(&flat)));
    });
    group.bench_function("cidrs_2000", |b| {
        b.iter(|| black_box(aggregate_cidrs(&flat)));
    });
    group.bench_function("structured_2000", |b| {
        b.iter(|| black_box(render_structured(&report.trackers)));
    });

    group.finish();
}

fn bench_expand_pattern(c: &mut Criterion) {
    let pattern = (0..200)
        .map(|i| format!("\\.cdn{}\\.tracker\\.example", i))
        .collect::<Vec<_>>()
        .join("|");

    c.bench_function("expand_host_pattern_200", |b| {
        b.iter(|| black_box(expand_host_pattern(&pattern)));
    });
}

criterion_group!(benches, bench_merge_flat, bench_render, bench_expand_pattern);
criterion_main!(benches);
