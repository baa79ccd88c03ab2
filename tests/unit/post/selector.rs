//! Match selection: caps, overlap policy and replacement

use SALT::post::{Insertion, MatchStore, SelectRejection, SelectorLimits};

use super::super::helpers::{make_match, Xorshift};

fn limits(max_per_query: usize, max_per_reference: usize) -> SelectorLimits {
    SelectorLimits {
        max_per_query,
        max_per_reference,
        min_percent_identity: 0.0,
    }
}

#[test]
fn test_overlapping_scores_keep_best() {
    let store = MatchStore::new(limits(25, 1));
    assert!(matches!(store.insert(make_match(0, 4, 20, 100, 40)), Insertion::Kept { .. }));
    assert!(matches!(
        store.insert(make_match(0, 4, 30, 110, 40)),
        Insertion::Kept { displaced: 1 }
    ));
    let results = store.into_results();
    assert_eq!(results.len(), 1);
    let (query_id, matches) = &results[0];
    assert_eq!(*query_id, 0);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].raw_score(), 30);
}

#[test]
fn test_overlapping_weaker_arrival_is_rejected() {
    let store = MatchStore::new(limits(25, 1));
    store.insert(make_match(0, 4, 30, 100, 40));
    assert_eq!(
        store.insert(make_match(0, 4, 20, 120, 40)),
        Insertion::Rejected(SelectRejection::Overlap)
    );
}

#[test]
fn test_equal_score_overlap_does_not_displace() {
    let store = MatchStore::new(limits(25, 1));
    store.insert(make_match(0, 7, 30, 104, 40));
    assert_eq!(
        store.insert(make_match(0, 7, 30, 100, 40)),
        Insertion::Rejected(SelectRejection::Overlap)
    );
    let results = store.into_results();
    assert_eq!(results[0].1.len(), 1);
    assert_eq!(results[0].1[0].alignment.r_start, 104);
}

#[test]
fn test_caps_hold_for_arbitrary_streams() {
    let mut rng = Xorshift::new(31);
    for round in 0..20 {
        let max_per_query = 1 + rng.below(6);
        let max_per_reference = 1 + rng.below(3);
        let store = MatchStore::new(limits(max_per_query, max_per_reference));
        for _ in 0..300 {
            let query = rng.below(3) as u32;
            let reference = rng.below(5) as u32;
            let score = 10 + rng.below(90) as i32;
            let start = rng.below(2000);
            let length = 10 + rng.below(100);
            store.insert(make_match(query, reference, score, start, length));
        }
        for (query, matches) in store.into_results() {
            assert!(matches.len() <= max_per_query, "round {} query {}", round, query);
            for reference in 0..5 {
                let n = matches.iter().filter(|m| m.reference_id == reference).count();
                assert!(n <= max_per_reference, "round {} reference {}", round, reference);
            }
            // retained matches never overlap each other
            for (i, a) in matches.iter().enumerate() {
                for b in &matches[i + 1..] {
                    assert!(!a.overlaps(b));
                }
            }
            assert!(matches.windows(2).all(|w| w[0].rank_cmp(&w[1]).is_le()));
        }
    }
}

#[test]
fn test_identity_floor() {
    let store = MatchStore::new(SelectorLimits {
        min_percent_identity: 99.5,
        ..limits(25, 1)
    });
    let mut m = make_match(0, 1, 50, 0, 10);
    m.alignment.stats.identities = 9;
    assert_eq!(store.insert(m), Insertion::Rejected(SelectRejection::Identity));
    assert!(store.into_results().is_empty());
}
