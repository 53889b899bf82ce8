use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use obst_dp::{tables::CostTableBuilder, OptimalBst};
use rand::{rngs::StdRng, Rng, SeedableRng};
use sysinfo::{get_current_pid, ProcessRefreshKind, System};

fn random_weights(rng: &mut StdRng, len: usize) -> Vec<f64> {
    (0..len).map(|_| rng.gen_range(0.0..1.0)).collect()
}

fn rss_kib() -> u64 {
    let mut sys = System::new();
    sys.refresh_processes_specifics(ProcessRefreshKind::new());
    match get_current_pid().ok().and_then(|pid| sys.process(pid)) {
        Some(p) => p.memory() / 1024,
        None => 0,
    }
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("obst_build");
    group.sample_size(20);
    for &n in &[64usize, 128, 256] {
        group.bench_function(format!("full_build_{n}"), |b| {
            b.iter_batched(
                || {
                    let mut rng = StdRng::seed_from_u64(42);
                    let p = random_weights(&mut rng, n);
                    let q = random_weights(&mut rng, n + 1);
                    (p, q)
                },
                |(p, q)| {
                    let before = rss_kib();
                    let tree = OptimalBst::new((0..n).collect::<Vec<_>>(), p, Some(q))
                        .expect("valid weights");
                    let after = rss_kib();
                    criterion::black_box(tree.total_cost());
                    // record memory delta to stderr to avoid criterion noise
                    eprintln!("RSS KiB delta (obst {n}): {}", after.saturating_sub(before));
                },
                BatchSize::PerIteration,
            )
        });
    }
    group.finish();
}

fn bench_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("obst_tables");
    group.sample_size(20);
    for &n in &[128usize, 256] {
        let mut rng = StdRng::seed_from_u64(7);
        let p = random_weights(&mut rng, n);
        let q = random_weights(&mut rng, n + 1);
        let builder = CostTableBuilder::new(&p, Some(&q[..])).expect("valid weights");
        group.bench_function(format!("serial_{n}"), |b| {
            b.iter(|| criterion::black_box(builder.build_serial()))
        });
        #[cfg(feature = "parallel")]
        group.bench_function(format!("parallel_{n}"), |b| {
            b.iter(|| criterion::black_box(builder.build_parallel()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_tables);
criterion_main!(benches);
