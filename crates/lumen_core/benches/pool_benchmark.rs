//! # Pool Churn Benchmark
//!
//! REQUIREMENTS:
//! - Steady-state acquire/release with zero pool growth
//! - Deferred drain of a full frame's worth of objects
//!
//! Run with: `cargo bench --package lumen_core`

// Benchmarks don't need docs
#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lumen_core::{DeferredPool, ObjectPool, PoolConfig, Recyclable};

/// Objects touched per simulated frame.
const FRAME_OBJECTS: usize = 10_000;

#[derive(Default)]
struct Payload {
    position: [f32; 2],
    life: f32,
}

impl Recyclable for Payload {
    fn on_recycle(&mut self) {
        self.position = [0.0; 2];
        self.life = 0.0;
    }
}

/// Benchmark: acquire then release one object at a time on a warm pool.
fn bench_single_churn(c: &mut Criterion) {
    let mut pool: ObjectPool<Payload> = ObjectPool::with_config(PoolConfig::with_capacity(1));
    c.bench_function("pool_acquire_release", |b| {
        b.iter(|| {
            let handle = pool.acquire().unwrap();
            if let Some(payload) = pool.get_mut(handle) {
                payload.life = 1.0;
            }
            pool.release(black_box(handle)).unwrap();
        });
    });
}

/// Benchmark: a whole frame of objects out and back.
fn bench_frame_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_churn");

    for count in [1_000, FRAME_OBJECTS] {
        let mut pool: ObjectPool<Payload> = ObjectPool::with_config(PoolConfig::with_capacity(count));
        let mut handles = Vec::with_capacity(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                for _ in 0..count {
                    handles.push(pool.acquire().unwrap());
                }
                for handle in handles.drain(..) {
                    pool.release(handle).unwrap();
                }
                black_box(pool.capacity())
            });
        });
    }

    group.finish();
}

/// Benchmark: deferred release plus drain at the tick boundary.
fn bench_deferred_drain(c: &mut Criterion) {
    let mut pool: DeferredPool<Payload> =
        DeferredPool::with_config(PoolConfig::with_capacity(FRAME_OBJECTS));
    c.bench_function("deferred_drain_10k", |b| {
        b.iter(|| {
            for _ in 0..FRAME_OBJECTS {
                let handle = pool.obtain().unwrap();
                pool.release(handle).unwrap();
            }
            black_box(pool.advance(0.016))
        });
    });
}

criterion_group!(benches, bench_single_churn, bench_frame_churn, bench_deferred_drain);
criterion_main!(benches);
