//! End-to-end streams with known change points.
//!
//! Two kinds of stream are used. Block-shuffled streams repeat ten fixed
//! transactions in seeded random order; every block boundary lines up with
//! a bucket boundary, so item supports are exact within each regime and the
//! exact detection points do not depend on the seed. Bernoulli streams draw
//! every item independently, so the bound also sees sampling noise.

use crate::drift::rebuild_segment;
use crate::fptree::FpTree;
use crate::item::Item;
use crate::stream::{detect_drift, Detection};
use crate::window::Bucket;
use crate::DriftConfig;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

const BLOCK: usize = 10;

/// Emits `blocks` shuffled copies of `template`.
fn shuffled_blocks(
    template: &[Vec<&'static str>],
    blocks: usize,
    rng: &mut Xoshiro256PlusPlus,
) -> Vec<Vec<&'static str>> {
    assert_eq!(template.len(), BLOCK);
    let mut out = Vec::with_capacity(blocks * BLOCK);
    for _ in 0..blocks {
        let mut block = template.to_vec();
        block.shuffle(rng);
        out.extend(block);
    }
    out
}

/// Ten baskets where "a" appears in `a_count` of them, "b" in all of them
/// and "c" in every other one.
fn basket_template(a_count: usize) -> Vec<Vec<&'static str>> {
    (0..BLOCK)
        .map(|i| {
            let mut basket = vec!["b"];
            if i < a_count {
                basket.push("a");
            }
            if i % 2 == 0 {
                basket.push("c");
            }
            basket
        })
        .collect()
}

/// 500 transactions with "a" at 0.9 followed by 500 with "a" at 0.1.
fn abrupt_change_stream(seed: u64) -> Vec<Vec<&'static str>> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut stream = shuffled_blocks(&basket_template(9), 50, &mut rng);
    stream.extend(shuffled_blocks(&basket_template(1), 50, &mut rng));
    stream
}

/// `before` transactions with "a" at `p_before`, then `after` with "a" at
/// `p_after`. "b" and "c" stay at 0.5 and 0.3 throughout.
fn bernoulli_stream(
    seed: u64,
    (before, p_before): (usize, f64),
    (after, p_after): (usize, f64),
) -> Vec<Vec<&'static str>> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut draw = |p_a: f64| {
        let mut basket = Vec::new();
        if rng.random_bool(p_a) {
            basket.push("a");
        }
        if rng.random_bool(0.5) {
            basket.push("b");
        }
        if rng.random_bool(0.3) {
            basket.push("c");
        }
        basket
    };

    let mut stream: Vec<_> = (0..before).map(|_| draw(p_before)).collect();
    stream.extend((0..after).map(|_| draw(p_after)));
    stream
}

fn support(detection: &Detection<&'static str>, item: &'static str) -> f64 {
    let count = detection
        .tree
        .item_count()
        .get(&Item::new(item))
        .copied()
        .unwrap_or(0);
    count as f64 / detection.tree.num_transactions() as f64
}

fn scenario_b_config() -> DriftConfig {
    DriftConfig {
        window_len: 50,
        merge_threshold: 2,
        min_cut_len: 20,
        local_cut_confidence: 0.05,
    }
}

/// Stationary stream with exact per-bucket supports. An i.i.d. stationary
/// stream is not expected to stay silent: the bound narrows with segment
/// length, so sampling noise alone can cross it.
#[test]
fn test_exact_support_stationary_stream_never_drifts() {
    let template = vec![
        vec!["milk", "bread"],
        vec!["milk", "bread", "eggs"],
        vec!["beer", "diapers"],
        vec!["milk", "diapers", "beer"],
        vec!["bread"],
        vec!["milk", "bread", "butter"],
        vec!["eggs"],
        vec!["beer", "chips"],
        vec!["milk", "bread", "diapers", "beer"],
        vec!["bread", "butter"],
    ];
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
    let stream = shuffled_blocks(&template, 100, &mut rng);

    let detections: Vec<_> = detect_drift(stream, &scenario_b_config())
        .unwrap()
        .collect();
    assert!(detections.is_empty(), "spurious drift: {} detections", detections.len());
}

#[test]
fn test_abrupt_change_detected_after_change_point() {
    // Exact supports: nothing can fire inside the first regime.
    let detections: Vec<_> = detect_drift(abrupt_change_stream(42), &scenario_b_config())
        .unwrap()
        .collect();

    assert!(!detections.is_empty());
    assert!(detections.iter().all(|d| d.transactions_consumed > 500));

    let last = detections.last().unwrap();
    assert!(support(last, "a") <= 0.2, "support(a) = {}", support(last, "a"));
    assert_eq!(support(last, "b"), 1.0);
    assert!(last.tree.is_sorted());
}

#[test]
fn test_bernoulli_change_detected_after_change_point() {
    for seed in 0..10 {
        let stream = bernoulli_stream(seed, (500, 0.9), (500, 0.1));
        let detections: Vec<_> = detect_drift(stream, &scenario_b_config())
            .unwrap()
            .collect();

        let after_change: Vec<_> = detections
            .iter()
            .filter(|d| d.transactions_consumed > 500)
            .collect();
        assert!(!after_change.is_empty(), "seed {}: no detection after 500", seed);
        assert!(
            after_change.iter().any(|d| support(d, "a") < 0.3),
            "seed {}: no post-change tree with rare \"a\"",
            seed
        );
        for detection in &after_change {
            assert!(detection.tree.num_transactions() >= 20);
            assert!(detection.tree.is_sorted());
        }
    }
}

#[test]
fn test_abrupt_change_detection_points() {
    // At 550 the window is [200, 200, 100, 50]: the cut lands at 400, one
    // bucket before the change. The next boundary cuts exactly at 500.
    let detections: Vec<_> = detect_drift(abrupt_change_stream(3), &scenario_b_config())
        .unwrap()
        .collect();

    let consumed: Vec<usize> = detections.iter().map(|d| d.transactions_consumed).collect();
    assert_eq!(consumed, vec![550, 600]);
    assert_eq!(detections[0].tree.num_transactions(), 150);
    assert_eq!(detections[1].tree.num_transactions(), 100);
    assert_eq!(support(&detections[1], "a"), 0.1);
}

#[test]
fn test_unreachable_min_cut_len_never_drifts() {
    let config = DriftConfig {
        min_cut_len: 1_000,
        ..scenario_b_config()
    };
    let mut stream = detect_drift(abrupt_change_stream(42), &config).unwrap();
    assert!(stream.next().is_none());
    assert_eq!(stream.detector().transactions_consumed(), 1_000);
}

#[test]
fn test_rebuild_single_transaction_bucket() {
    let mut bucket = Bucket::new();
    for _ in 0..5 {
        bucket.add(vec![Item::new("x"), Item::new("y"), Item::new("z")]);
    }
    let item_count = bucket.tree().item_count().clone();

    let segment = rebuild_segment(std::slice::from_ref(&bucket), &item_count);
    assert_eq!(segment.tree.num_transactions(), 5);
    assert_eq!(segment.avg_path_len, 3.0);

    let paths: Vec<_> = segment.tree.iter().collect();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].1, 5);
}

#[test]
fn test_rebuilt_tree_independent_of_window() {
    let mut tree = FpTree::new();
    tree.insert(&[Item::new("x")], 3);
    let bucket = Bucket::from_tree(tree);
    let item_count = bucket.tree().item_count().clone();

    let mut segment = rebuild_segment(std::slice::from_ref(&bucket), &item_count);
    segment.tree.insert(&[Item::new("y")], 1);

    assert_eq!(bucket.len(), 3);
    assert_eq!(segment.tree.num_transactions(), 4);
}
