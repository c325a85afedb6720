#[macro_use]
extern crate criterion;
extern crate bandbrot;
extern crate num;

use bandbrot::{escape_count, render, render_threaded, GridSpec, Partition, RemainderPolicy};
use criterion::{black_box, Criterion};
use num::Complex;

fn kernel(c: &mut Criterion) {
    c.bench_function("escape_count inside the set", |b| {
        b.iter(|| escape_count(black_box(Complex::new(-0.1, 0.1)), 256))
    });
    c.bench_function("escape_count on the boundary", |b| {
        b.iter(|| escape_count(black_box(Complex::new(-0.75, 0.1)), 256))
    });
}

fn bands(c: &mut Criterion) {
    let spec = GridSpec::new(200, 200, Complex::new(-2.0, -2.0), Complex::new(2.0, 2.0), 256)
        .unwrap();
    let shard = Partition::new(200, 4, RemainderPolicy::Reject)
        .unwrap()
        .shard(1);
    c.bench_function("render one band", move |b| b.iter(|| render(&shard, &spec)));
    c.bench_function("render one band on 4 threads", move |b| {
        b.iter(|| render_threaded(&shard, &spec, 4).unwrap())
    });
}

criterion_group!(benches, kernel, bands);
criterion_main!(benches);
