//! Criterion benchmarks for the hotkey hot path.
//!
//! Every physical key event on the machine passes through the hotkey filter
//! while RoFreeze runs, so it has to stay a handful of comparisons.  Key-name
//! parsing only runs at config load but is measured for completeness.
//!
//! Run with:
//! ```bash
//! cargo bench --package rofreeze-core --bench hotkey_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rofreeze_core::{HotkeyBindings, HotkeyFilter, VirtualKey};

/// A typing burst: mostly unbound keys with the occasional hotkey.
const KEY_STREAM: &[u8] = &[
    b'W', b'A', b'S', b'D', 0x20, b'Q', b'E', b'R', 0x72, 0x10, b'W', b'W', 0x11, b'Q',
];

fn bench_filter_key_stream(c: &mut Criterion) {
    c.bench_function("hotkey_filter/key_stream", |b| {
        let mut filter = HotkeyFilter::new(HotkeyBindings::default());
        b.iter(|| {
            for &code in KEY_STREAM {
                let key = VirtualKey(code);
                black_box(filter.key_down(black_box(key)));
                filter.key_up(key);
            }
        })
    });
}

fn bench_filter_auto_repeat(c: &mut Criterion) {
    c.bench_function("hotkey_filter/held_key_auto_repeat", |b| {
        let mut filter = HotkeyFilter::new(HotkeyBindings::default());
        filter.key_down(VirtualKey::F3);
        b.iter(|| black_box(filter.key_down(black_box(VirtualKey::F3))))
    });
}

fn bench_parse_key_names(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_name_parse");
    for name in ["Q", "F3", "Space", "PageDown", "Hyper"] {
        group.bench_with_input(BenchmarkId::from_parameter(name), name, |b, name| {
            b.iter(|| black_box(name.parse::<VirtualKey>().ok()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_filter_key_stream,
    bench_filter_auto_repeat,
    bench_parse_key_names
);
criterion_main!(benches);
