//! Decode pipeline benchmarks

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rxb6::{NullSink, Receiver};

/// Render a value as capture lines, as the device would emit them
fn capture_lines(value: u64, bits: u32) -> Vec<String> {
    let mut lines = vec![
        "SYNC".to_string(),
        "1 8990".to_string(),
        "0 590".to_string(),
    ];
    for i in (0..bits).rev() {
        let high = if (value >> i) & 1 == 1 { 4080 } else { 2020 };
        lines.push("0 600".to_string());
        lines.push(format!("1 {}", high));
    }
    lines.push("SYNC".to_string());
    lines
}

fn bench_decode(c: &mut Criterion) {
    let value: u64 = (1161 << 25) | (213 << 9) | (50 << 1);
    let mut lines = Vec::new();
    for _ in 0..100 {
        lines.extend(capture_lines(value, 37));
    }
    let receiver = Receiver::new().with_sink(Arc::new(NullSink));

    c.bench_function("decode_100_frames", |b| {
        b.iter(|| {
            let readings: Vec<_> = receiver
                .readings(black_box(lines.clone()).into_iter())
                .collect();
            black_box(readings)
        })
    });
}

fn bench_segmentation(c: &mut Criterion) {
    let value: u64 = (1161 << 25) | (213 << 9) | (50 << 1);
    let mut lines = Vec::new();
    for _ in 0..100 {
        lines.extend(capture_lines(value, 37));
    }
    let receiver = Receiver::new().with_sink(Arc::new(NullSink));

    c.bench_function("segment_100_frames", |b| {
        b.iter(|| {
            let frames: Vec<_> = receiver.frames(black_box(lines.clone()).into_iter()).collect();
            black_box(frames)
        })
    });
}

criterion_group!(benches, bench_decode, bench_segmentation);
criterion_main!(benches);
