#![cfg(feature = "parallel")]

use obst_dp::{tables::CostTableBuilder, OptimalBst};
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_weights(rng: &mut StdRng, len: usize) -> Vec<f64> {
    (0..len).map(|_| rng.gen_range(0.0..1.0)).collect()
}

#[test]
fn parallel_tables_match_serial_on_medium_input() {
    let mut rng = StdRng::seed_from_u64(7);
    let p = random_weights(&mut rng, 150);
    let q = random_weights(&mut rng, 151);
    let builder = CostTableBuilder::new(&p, Some(&q[..])).unwrap();
    assert_eq!(builder.build_parallel(), builder.build_serial());
}

#[test]
fn parallel_fill_keeps_tie_break() {
    let p = vec![1.0; 9];
    let builder = CostTableBuilder::new(&p, None).unwrap();
    let serial = builder.build_serial();
    let parallel = builder.build_parallel();
    for i in 1..=9 {
        for j in i..=9 {
            assert_eq!(parallel.root(i, j), serial.root(i, j), "R[{i}][{j}]");
        }
    }
}

proptest! {
    #[test]
    fn parallel_build_matches_serial(
        p in proptest::collection::vec(0.0f64..1.0, 0..40),
        seed in any::<u64>()
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let q = random_weights(&mut rng, p.len() + 1);
        let builder = CostTableBuilder::new(&p, Some(&q[..])).unwrap();
        prop_assert_eq!(builder.build_parallel(), builder.build_serial());

        let tree = OptimalBst::new((0..p.len()).collect::<Vec<_>>(), p.clone(), Some(q.clone())).unwrap();
        prop_assert_eq!(tree.tables(), &builder.build_serial());
    }
}
