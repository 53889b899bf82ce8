use criterion::{criterion_group, criterion_main, Criterion};
use obst_dp::OptimalBst;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn sample_tree(n: usize) -> OptimalBst<u32> {
    let mut rng = StdRng::seed_from_u64(11);
    let p: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..1.0)).collect();
    OptimalBst::new((0..n as u32).collect(), p, None).expect("valid weights")
}

fn bench_queries(c: &mut Criterion) {
    let tree = sample_tree(200);
    let mut group = c.benchmark_group("obst_queries");

    group.bench_function("depth_all_keys", |b| {
        b.iter(|| {
            let total: usize = tree.iter().filter_map(|k| tree.depth(Some(k))).sum();
            criterion::black_box(total)
        })
    });

    group.bench_function("children_all_keys", |b| {
        b.iter(|| {
            let leaves = tree
                .iter()
                .filter(|k| tree.children(Some(*k)) == (None, None))
                .count();
            criterion::black_box(leaves)
        })
    });

    group.bench_function("search_path_all_keys", |b| {
        b.iter(|| {
            let total: usize = tree
                .iter()
                .filter_map(|k| tree.search_path(k).map(|p| p.len()))
                .sum();
            criterion::black_box(total)
        })
    });

    group.bench_function("render", |b| b.iter(|| criterion::black_box(tree.to_string())));

    group.bench_function("in_order", |b| b.iter(|| criterion::black_box(tree.in_order().count())));

    group.finish();
}

criterion_group!(benches, bench_queries);
criterion_main!(benches);
