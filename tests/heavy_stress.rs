#![cfg(feature = "heavy")]
use obst_dp::{utils::approx_eq, OptimalBst};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[test]
fn heavy_stress_random_weights() {
    let mut rng = StdRng::seed_from_u64(123);
    let n = 600;
    let p: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..1.0)).collect();
    let q: Vec<f64> = (0..=n).map(|_| rng.gen_range(0.0..0.5)).collect();
    let tree = OptimalBst::new((0..n).collect::<Vec<_>>(), p.clone(), Some(q.clone())).unwrap();

    assert_eq!(tree.len(), n);
    let by_depth: f64 = (0..n)
        .map(|k| (tree.depth(Some(&k)).unwrap() + 1) as f64 * p[k])
        .sum::<f64>()
        + (0..=n)
            .map(|g| (tree.gap_depth(g).unwrap() + 1) as f64 * q[g])
            .sum::<f64>();
    assert!(approx_eq(by_depth, tree.total_cost()));
}

#[test]
fn heavy_stress_deep_chain() {
    // Each key outweighs all keys after it, so the optimum is a right chain.
    let n = 400;
    let p: Vec<f64> = (1..=n).map(|i| 0.5f64.powi(i as i32)).collect();
    let tree = OptimalBst::new((0..n).collect::<Vec<_>>(), p, None).unwrap();
    assert_eq!(tree.root(), Some(&0));
    assert!(tree.height() > 50);
    assert_eq!(tree.to_string().matches('(').count(), n);
    assert!(tree.in_order().eq(tree.iter()));
}
