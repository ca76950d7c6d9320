//! Criterion benchmarks for cursor image capture and classification.
//!
//! Capture (SHA-256 plus RGBA normalisation) runs on every cursor-shape
//! change; classification of a repeated image should cost only a hash compare.
//!
//! Run with:
//! ```bash
//! cargo bench --package input-bridge-core --bench cursor_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use input_bridge_core::cursor::{BitmapRepresentation, CursorSnapshot, PixelFormat, RawCursorImage};
use input_bridge_core::protocol::codec::encode_cursor_payload;
use input_bridge_core::CursorIdentityCache;

// ── Fixture builders ──────────────────────────────────────────────────────────

/// A square BGRA cursor with a 1x and a 2x representation.
fn raw_cursor(size: u32, shade: u8) -> RawCursorImage {
    let rep = |s: u32| BitmapRepresentation {
        width: s,
        height: s,
        format: PixelFormat::Bgra8,
        bytes: [shade, shade, shade, 0xFF].repeat((s * s) as usize),
    };
    RawCursorImage {
        representations: vec![rep(size), rep(size * 2)],
        hotspot_x: 1,
        hotspot_y: 1,
        scale_factor: 2.0,
    }
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_capture(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor_capture");

    for size in [32u32, 64, 128] {
        let image = raw_cursor(size, 0x40);
        group.bench_with_input(BenchmarkId::from_parameter(size), &image, |b, img| {
            b.iter(|| CursorSnapshot::capture(black_box(img)))
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor_classify");
    let a = CursorSnapshot::capture(&raw_cursor(32, 1)).expect("fixture is well-formed");
    let b_snap = CursorSnapshot::capture(&raw_cursor(32, 2)).expect("fixture is well-formed");

    // Alternating between two cached images: every call is a cache hit
    group.bench_function("alternating_cached", |b| {
        let mut cache = CursorIdentityCache::new();
        cache.subscribe(1, false);
        cache.subscribe(2, false);
        b.iter(|| {
            cache.classify(black_box(&a));
            cache.classify(black_box(&b_snap))
        })
    });

    group.bench_function("unchanged", |b| {
        let mut cache = CursorIdentityCache::new();
        cache.classify(&a);
        b.iter(|| cache.classify(black_box(&a)))
    });

    group.finish();
}

fn bench_payload(c: &mut Criterion) {
    let snap = CursorSnapshot::capture(&raw_cursor(64, 7)).expect("fixture is well-formed");
    c.bench_function("cursor_payload_encode_64", |b| {
        b.iter(|| encode_cursor_payload(black_box(&snap)))
    });
}

criterion_group!(benches, bench_capture, bench_classify, bench_payload);
criterion_main!(benches);
