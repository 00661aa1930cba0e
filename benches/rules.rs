use chronosweep::{FolderRule, PatternRule, parse_duration};
use chrono::TimeDelta;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::path::Path;

fn bench_parse_duration(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_duration");

    group.bench_function("days", |b| {
        b.iter(|| parse_duration(black_box("5d")));
    });

    group.bench_function("bare_integer", |b| {
        b.iter(|| parse_duration(black_box("30")));
    });

    group.bench_function("padded_uppercase", |b| {
        b.iter(|| parse_duration(black_box("  12H ")));
    });

    group.bench_function("invalid", |b| {
        b.iter(|| parse_duration(black_box("5 days")));
    });

    group.finish();
}

fn sample_rule() -> FolderRule {
    let patterns = ["^ScreenShot", r"^IMG_\d+", r".*\.tmp", "^Untitled"]
        .into_iter()
        .map(|p| {
            PatternRule::builder(p, TimeDelta::days(1))
                .build()
                .expect("valid pattern")
        });

    FolderRule::builder(std::env::temp_dir().join("bench-root"), TimeDelta::days(10))
        .exemptions(["keep.txt", "projects/important", "notes"])
        .patterns(patterns)
        .build()
        .expect("valid rule")
}

fn bench_policy(c: &mut Criterion) {
    let rule = sample_rule();
    let mut group = c.benchmark_group("FolderRule");

    group.bench_function("effective_policy/first_pattern", |b| {
        b.iter(|| rule.effective_policy(black_box(Path::new("ScreenShot_001.png"))));
    });

    group.bench_function("effective_policy/no_match", |b| {
        b.iter(|| rule.effective_policy(black_box(Path::new("a/b/c/report.pdf"))));
    });

    group.bench_function("is_exempt/prefix", |b| {
        b.iter(|| rule.is_exempt(black_box(Path::new("projects/important/src/main.rs"))));
    });

    group.bench_function("is_exempt/miss", |b| {
        b.iter(|| rule.is_exempt(black_box(Path::new("downloads/archive/file.zip"))));
    });

    group.finish();
}

criterion_group!(benches, bench_parse_duration, bench_policy);
criterion_main!(benches);
