//! Example: optimal binary search tree for the textbook five-key instance.
//!
//! Run with:
//! `cargo run --example obst`

use obst_dp::OptimalBst;

fn main() {
    // Keys k1..k5 with access probabilities p and gap probabilities q
    // (q[0] before k1, q[i] between k_i and k_{i+1}, q[5] after k5).
    let keys = vec!["k1", "k2", "k3", "k4", "k5"];
    let p = vec![0.15, 0.10, 0.05, 0.10, 0.20];
    let q = vec![0.05, 0.10, 0.05, 0.05, 0.05, 0.10];

    let tree = match OptimalBst::new(keys, p, Some(q)) {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("cannot build tree: {err}");
            std::process::exit(1);
        }
    };

    println!("Tree: {tree}");
    println!("Expected search cost: {:.2}", tree.total_cost());
    println!("Height: {}", tree.height());
    println!("Per key:");
    for key in &tree {
        let (left, right) = tree.children(Some(key));
        println!(
            "  {key}: depth={}, subtree cost={:.2}, children=({}, {})",
            tree.depth(Some(key)).unwrap_or_default(),
            tree.expected_cost(Some(key)).unwrap_or_default(),
            left.copied().unwrap_or("-"),
            right.copied().unwrap_or("-"),
        );
    }
}
