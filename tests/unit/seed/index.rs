//! Building, sorting, partitioning and joining seed indexes from sequences

use SALT::seed::{Partitioner, SeedEntry, SeedIndexStore, SeedLocation, SeedMatcher, SeedShape};
use SALT::sequence::Reduction;

use super::super::helpers::{dna, random_dna};

/// Every good seed of `seq` under `shape`, sorted
fn index(shape: &SeedShape, reduction: &Reduction, id: usize, seq: &[u8]) -> SeedIndexStore {
    let mut store = SeedIndexStore::new(shape.bits_per_letter());
    for pos in 0..=seq.len().saturating_sub(shape.length()) {
        if let Some(code) = shape.good_seed_at(reduction, seq, pos) {
            store.add_seed(code, SeedLocation::new(id, pos, 0).unwrap()).unwrap();
        }
    }
    store.sort();
    store
}

#[test]
fn test_tandem_repeat_with_single_occurrence() {
    let reduction = Reduction::dna();
    let shape = SeedShape::parse(0, "1111", &reduction).unwrap();
    let query = index(&shape, &reduction, 0, &dna(b"GCAT"));
    let reference = index(&shape, &reduction, 0, &dna(b"GCATAAGCAT"));

    let mut pairs = Vec::new();
    let stats = SeedMatcher::new(1)
        .for_each_pair(query.entries(), reference.entries(), |q, r| {
            pairs.push((q.location().position, r.location().position));
            Ok(())
        })
        .unwrap();
    assert_eq!(pairs, vec![(0, 0)]);
    assert_eq!(stats.pairs, 1);
    assert_eq!(stats.capped_codes, 1);

    // without the cap both copies pair up
    let mut all = 0;
    SeedMatcher::new(10)
        .for_each_pair(query.entries(), reference.entries(), |_, _| {
            all += 1;
            Ok(())
        })
        .unwrap();
    assert_eq!(all, 2);
}

#[test]
fn test_filler_windows_are_skipped() {
    let reduction = Reduction::dna();
    let shape = SeedShape::parse(0, "1101", &reduction).unwrap();
    // the N falls on an informative position of windows 0, 2 and 3
    let store = index(&shape, &reduction, 0, &dna(b"ACGNTACG"));
    let positions: Vec<u32> = store.entries().iter().map(|e| e.location().position).collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![1, 4]);
}

#[test]
fn test_sorted_index_matches_comparison_sort() {
    let reduction = Reduction::dna();
    let shape = SeedShape::parse(0, "11011011", &reduction).unwrap();
    let seq = dna(&random_dna(3000, 77));
    let store = index(&shape, &reduction, 3, &seq);

    let mut expected: Vec<SeedEntry> = (0..=seq.len() - shape.length())
        .filter_map(|pos| {
            shape
                .good_seed_at(&reduction, &seq, pos)
                .map(|code| SeedEntry::new(code, SeedLocation::new(3, pos, 0).unwrap()))
        })
        .collect();
    expected.sort_by_key(|e| (e.code, e.location));
    assert_eq!(store.entries(), expected.as_slice());
}

#[test]
fn test_partition_routing_covers_every_bucket() {
    let partitioner = Partitioner::new(4, 8).unwrap();
    let mut seen = vec![vec![false; 8]; 4];
    for code in 0..100_000u64 {
        let (chunk, job) = partitioner.route(code);
        assert!(chunk < 4 && job < 8);
        assert_eq!(chunk, ((code / 31) & 3) as usize);
        assert_eq!(job, (((code / 31) >> 2) & 7) as usize);
        seen[chunk][job] = true;
    }
    assert!(seen.iter().flatten().all(|&s| s));
}

#[test]
fn test_partition_rejects_non_power_of_two() {
    assert!(Partitioner::new(3, 8).is_err());
    assert!(Partitioner::new(1, 12).is_err());
    assert!(Partitioner::new(0, 1).is_err());
}
