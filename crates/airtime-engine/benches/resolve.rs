// benches/resolve.rs
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use airtime_engine::range::resolve_time_range;
use airtime_engine::segment::{clean_block_text, segment};

const SAMPLES: &[&str] = &[
    "LIVE · 7:05 – 9:00 PM The Morning Show Your favorite hits to start the day",
    "11PM – 12AM",
    "5 – 7 AM The Sunrise Show easy starts",
    "12 – 6 AM Overnight Show quiet hours",
    "Up next 9 – 11 PM then 7:05 PM – 9:00 PM tonight",
    "7:05 – 9:00 PMThe Night ListYour wind-down soundtrack",
    "Country Gold all the biggest country songs",
    "no schedule information in this block at all",
];

fn bench_resolve(c: &mut Criterion) {
    c.bench_function("resolve_time_range", |b| {
        b.iter(|| {
            SAMPLES
                .iter()
                .filter_map(|s| resolve_time_range(black_box(s)))
                .count()
        })
    });

    c.bench_function("clean_and_segment", |b| {
        b.iter(|| {
            SAMPLES
                .iter()
                .map(|s| {
                    let slot = resolve_time_range(black_box(s));
                    let clean = clean_block_text(s, slot.as_ref());
                    segment(&clean, None, None)
                })
                .count()
        })
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
