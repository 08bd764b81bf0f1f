//! Criterion benchmarks for the elastika-core control plane
//!
//! Run with: cargo bench -p elastika-core
#![allow(missing_docs)]

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use elastika_core::{
    BlockDispatcher, Engine, EngineParam, HostParams, LagFilter, PushPolicy, Telemetry,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[32, 64, 128, 256, 512, 1024];

/// Engine with a trivial but non-elidable stereo transform.
#[derive(Default)]
struct Mixer {
    gain: f32,
    drive: f32,
}

impl Engine for Mixer {
    fn set_friction(&mut self, _value: f32) {}
    fn set_span(&mut self, _value: f32) {}
    fn set_stiffness(&mut self, _value: f32) {}
    fn set_curl(&mut self, _value: f32) {}
    fn set_mass(&mut self, _value: f32) {}
    fn set_drive(&mut self, value: f32) {
        self.drive = value;
    }
    fn set_gain(&mut self, value: f32) {
        self.gain = value;
    }
    fn set_input_tilt(&mut self, _value: f32) {}
    fn set_output_tilt(&mut self, _value: f32) {}
    fn process(&mut self, _sample_rate: f32, left: f32, right: f32) -> (f32, f32) {
        let g = self.gain * (1.0 + self.drive);
        (left * g, right * g)
    }
}

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_lag(c: &mut Criterion) {
    let mut group = c.benchmark_group("LagFilter");

    for &block_size in BLOCK_SIZES {
        group.bench_with_input(
            BenchmarkId::new("ramp", block_size),
            &block_size,
            |b, &n| {
                let mut lag = LagFilter::new(0.0);
                lag.set_rate(1.0 / n as f32);
                let mut target = 1.0;
                b.iter(|| {
                    lag.new_value(target);
                    for _ in 0..n {
                        black_box(lag.process());
                    }
                    target = 1.0 - target;
                });
            },
        );
    }

    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    for (label, policy) in [
        ("snapshot_matches_target", PushPolicy::SnapshotMatchesTarget),
        ("target_changed", PushPolicy::TargetChanged),
    ] {
        let mut group = c.benchmark_group(format!("BlockDispatcher/{label}"));

        for &block_size in BLOCK_SIZES {
            let input = generate_test_signal(block_size);

            group.bench_with_input(
                BenchmarkId::new("steady", block_size),
                &block_size,
                |b, &n| {
                    let host = HostParams::new();
                    let mut d = BlockDispatcher::new(Mixer::default(), Arc::new(Telemetry::new()))
                        .with_policy(policy);
                    d.prepare(SAMPLE_RATE, n);
                    let mut out_l = vec![0.0; n];
                    let mut out_r = vec![0.0; n];
                    b.iter(|| {
                        d.process_block(&host, &input, &input, &mut out_l, &mut out_r);
                        black_box(&out_l);
                    });
                },
            );

            group.bench_with_input(
                BenchmarkId::new("automated", block_size),
                &block_size,
                |b, &n| {
                    let host = HostParams::new();
                    let mut d = BlockDispatcher::new(Mixer::default(), Arc::new(Telemetry::new()))
                        .with_policy(policy);
                    d.prepare(SAMPLE_RATE, n);
                    let mut out_l = vec![0.0; n];
                    let mut out_r = vec![0.0; n];
                    let mut step = 0u32;
                    b.iter(|| {
                        let v = (step % 16) as f32 / 15.0;
                        for param in EngineParam::ALL {
                            host.set(param, v);
                        }
                        d.process_block(&host, &input, &input, &mut out_l, &mut out_r);
                        black_box(&out_r);
                        step = step.wrapping_add(1);
                    });
                },
            );
        }

        group.finish();
    }
}

criterion_group!(benches, bench_lag, bench_dispatch);
criterion_main!(benches);
