//! Criterion benchmarks for key code translation tables.
//!
//! Measures forward (native→canonical) and reverse (canonical→native)
//! lookups on every platform table, plus table construction.
//!
//! Run with:
//! ```bash
//! cargo bench --package input-bridge-core --bench keymap_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use input_bridge_core::keymap::KeyCodeTable;
use input_bridge_core::{CanonicalKeyCode, PlatformKind};

// ── Representative key codes for benchmarking ─────────────────────────────────

/// Canonical VK codes covering letters, control keys, modifiers and arrows.
const BENCH_CANONICAL: &[u16] = &[
    0x41, // 'A'
    0x5A, // 'Z'
    0x0D, // VK_RETURN
    0x1B, // VK_ESCAPE
    0x08, // VK_BACK
    0x09, // VK_TAB
    0x20, // VK_SPACE
    0x70, // VK_F1
    0x7B, // VK_F12
    0x11, // VK_CONTROL
    0x10, // VK_SHIFT
    0x12, // VK_MENU (Alt)
    0xA0, // VK_LSHIFT
    0x25, // VK_LEFT
    0x27, // VK_RIGHT
    0x26, // VK_UP
    0x28, // VK_DOWN
    0x31, // '1'
    0x30, // '0'
    0xFF, // No mapping
];

const PLATFORMS: [PlatformKind; 3] =
    [PlatformKind::Macos, PlatformKind::X11, PlatformKind::Windows];

// ── Benchmarks: reverse translation (command path) ───────────────────────────

fn bench_reverse_translate(c: &mut Criterion) {
    let mut group = c.benchmark_group("keymap_reverse");

    for platform in PLATFORMS {
        let table = KeyCodeTable::for_platform(platform);

        group.bench_with_input(BenchmarkId::new("single", platform.name()), &table, |b, t| {
            b.iter(|| t.reverse_translate(black_box(CanonicalKeyCode(0x41))))
        });

        // Batch of 20 diverse codes (simulates a burst of key events)
        group.bench_with_input(BenchmarkId::new("batch_20", platform.name()), &table, |b, t| {
            b.iter(|| {
                BENCH_CANONICAL
                    .iter()
                    .map(|&vk| t.reverse_translate(black_box(CanonicalKeyCode(vk))))
                    .collect::<Vec<_>>()
            })
        });
    }

    group.finish();
}

// ── Benchmarks: forward translation (local event path) ───────────────────────

fn bench_forward_translate(c: &mut Criterion) {
    let mut group = c.benchmark_group("keymap_forward");

    for platform in PLATFORMS {
        let table = KeyCodeTable::for_platform(platform);
        let natives: Vec<u32> = table.native_codes().collect();

        let id = BenchmarkId::new("full_table", platform.name());
        group.bench_with_input(id, &natives, |b, codes| {
            b.iter(|| {
                codes
                    .iter()
                    .filter_map(|&n| table.translate(black_box(n)))
                    .count()
            })
        });
    }

    group.finish();
}

// ── Benchmarks: table construction ───────────────────────────────────────────

fn bench_table_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("keymap_build");

    for platform in PLATFORMS {
        group.bench_function(platform.name(), |b| {
            b.iter(|| KeyCodeTable::for_platform(black_box(platform)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reverse_translate, bench_forward_translate, bench_table_build);
criterion_main!(benches);
