//! Sanitizer throughput benchmarks
//!
//! Measures clean text, hostile text that needs several passes, and nested
//! intake payloads.

use clinigate_sanitize::{sanitize_structure, sanitize_text};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Map, Value};

fn clinical_note(repeat: usize) -> String {
    "Patient reports mild headache, BP 120/80, follow up in two weeks. ".repeat(repeat)
}

fn hostile_note(repeat: usize) -> String {
    "<scr<script>x</script>ipt>alert(1)</script> onload=go() javascript:void(0) ';-- "
        .repeat(repeat)
}

fn intake_form(entries: usize) -> Map<String, Value> {
    let mut form = Map::new();
    for i in 0..entries {
        form.insert(
            format!("field_{i}"),
            json!({
                "label": "Allergies <script>steal()</script>",
                "values": ["penicillin", "latex';--", 42, null],
                "notes": { "free_text": " onclick=run() none known " },
            }),
        );
    }
    form
}

fn bench_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("sanitize_text");

    for repeat in [1usize, 16, 256] {
        let clean = clinical_note(repeat);
        group.throughput(Throughput::Bytes(clean.len() as u64));
        group.bench_with_input(BenchmarkId::new("clean", repeat), &clean, |b, input| {
            b.iter(|| sanitize_text(black_box(input)))
        });

        let hostile = hostile_note(repeat);
        group.throughput(Throughput::Bytes(hostile.len() as u64));
        group.bench_with_input(BenchmarkId::new("hostile", repeat), &hostile, |b, input| {
            b.iter(|| sanitize_text(black_box(input)))
        });
    }

    group.finish();
}

fn bench_structure(c: &mut Criterion) {
    let mut group = c.benchmark_group("sanitize_structure");

    for entries in [1usize, 32, 512] {
        let form = intake_form(entries);
        group.throughput(Throughput::Elements(entries as u64));
        group.bench_with_input(BenchmarkId::new("intake_form", entries), &form, |b, input| {
            b.iter(|| sanitize_structure(black_box(input)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_text, bench_structure);
criterion_main!(benches);
