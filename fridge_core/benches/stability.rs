use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use fridge_core::{DoorState, FilterCfg, FridgeAnalyzer, InboundEvent, StabilityFilter};

// Synthetic load-cell trace: plateaus with white noise and a step every `plateau` samples.
fn synth_trace(n: usize, noise_amp: f64, plateau: usize, seed: u32) -> Vec<f64> {
    // tiny PRNG
    let mut state = seed.max(1);
    let mut next_f64 = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        f64::from(x) / (f64::from(u32::MAX) + 1.0)
    };
    let mut v = Vec::with_capacity(n);
    for i in 0..n {
        let level = 10.0 - 0.88 * ((i / plateau.max(1)) % 4) as f64;
        let noise = (next_f64() * 2.0 - 1.0) * noise_amp;
        v.push(level + noise);
    }
    v
}

pub fn bench_filter(c: &mut Criterion) {
    let mut g = c.benchmark_group("stability_filter");
    // Allow quick tweaking without CLI flags (Criterion 0.5):
    //   BENCH_SAMPLE_SIZE=10 cargo bench -p fridge_core --bench stability
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE") {
        if let Ok(n) = ss.parse::<usize>() {
            g.sample_size(n.max(10));
        }
    } else {
        g.sample_size(50);
    }

    let trace = synth_trace(10_000, 0.01, 50, 0xC0FFEE);
    for window_size in [4usize, 10, 32] {
        g.bench_function(format!("observe_n{window_size}"), |b| {
            b.iter_batched(
                || {
                    StabilityFilter::new(FilterCfg {
                        window_size,
                        stable_deviation: 0.015,
                    })
                    .unwrap()
                },
                |mut f| {
                    let mut stable = 0usize;
                    for &s in &trace {
                        if f.observe(black_box(s)).is_some() {
                            stable += 1;
                        }
                    }
                    black_box(stable)
                },
                BatchSize::SmallInput,
            )
        });
    }
    g.finish();
}

pub fn bench_analyzer(c: &mut Criterion) {
    let trace = synth_trace(10_000, 0.01, 50, 7);
    c.bench_function("analyzer_ingest_with_door_cycles", |b| {
        b.iter_batched(
            || FridgeAnalyzer::builder().try_build().unwrap(),
            |mut a| {
                for (i, &s) in trace.iter().enumerate() {
                    if i % 50 == 10 {
                        a.ingest(InboundEvent::Door(DoorState::Open));
                    } else if i % 50 == 12 {
                        a.ingest(InboundEvent::Door(DoorState::Closed));
                    }
                    a.ingest(InboundEvent::RawWeight(black_box(s)));
                }
                black_box(a.pending())
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_filter, bench_analyzer);
criterion_main!(benches);
