//! Error propagation out of worker phases

use SALT::config::SearchMode;
use SALT::engine::search;
use SALT::error::{ErrorKind, Result, SaltError};
use SALT::seed::mask::MaskBits;
use SALT::seed::SeedShape;
use SALT::sequence::{FrameScheme, SequenceCode, SequenceType};
use SALT::store::{InMemoryQueryStore, InMemoryReferenceStore, QueryStore, ReferenceStore};

use super::super::helpers::{random_dna, random_protein, records, test_options};

/// Query store whose reverse strand of one query cannot be read
struct UnreadableStrand {
    inner: InMemoryQueryStore,
    broken: usize,
}

impl QueryStore for UnreadableStrand {
    fn sequence_count(&self) -> usize {
        self.inner.sequence_count()
    }

    fn frame_scheme(&self) -> FrameScheme {
        self.inner.frame_scheme()
    }

    fn sequence_code(&self, id: usize, frame_rank: usize) -> Result<&SequenceCode> {
        self.inner.sequence_code(id, frame_rank)
    }

    fn residues(&self, id: usize, frame_rank: usize) -> Result<&[u8]> {
        if id == self.broken && frame_rank == 1 {
            return Err(SaltError::InvariantViolation(format!("strand of query {} unreadable", id)));
        }
        self.inner.residues(id, frame_rank)
    }

    fn name(&self, id: usize) -> Result<&str> {
        self.inner.name(id)
    }

    fn original_length(&self, id: usize) -> Result<usize> {
        self.inner.original_length(id)
    }
}

/// Reference store that reports the seed shapes its masks were built for
struct IndexedReferences {
    inner: InMemoryReferenceStore,
    shapes: Vec<SeedShape>,
}

impl ReferenceStore for IndexedReferences {
    fn sequence_type(&self) -> SequenceType {
        self.inner.sequence_type()
    }

    fn sequence_count(&self) -> usize {
        self.inner.sequence_count()
    }

    fn sequence_code(&self, id: usize) -> Result<&SequenceCode> {
        self.inner.sequence_code(id)
    }

    fn residues(&self, id: usize) -> Result<&[u8]> {
        self.inner.residues(id)
    }

    fn name(&self, id: usize) -> Result<&str> {
        self.inner.name(id)
    }

    fn total_length(&self) -> u64 {
        self.inner.total_length()
    }

    fn mask(&self, id: usize, shape_id: usize) -> Option<&MaskBits> {
        self.inner.mask(id, shape_id)
    }

    fn seed_shapes(&self) -> Option<&[SeedShape]> {
        Some(&self.shapes)
    }
}

#[test]
fn test_worker_error_is_returned_not_cancelled() {
    let reference = random_dna(600, 71);
    let reads: Vec<Vec<u8>> = (0..8).map(|i| reference[i * 50..i * 50 + 120].to_vec()).collect();
    let names: Vec<String> = (0..reads.len()).map(|i| format!("read{}", i)).collect();
    let query_set: Vec<(&str, &[u8])> = names
        .iter()
        .zip(&reads)
        .map(|(n, r)| (n.as_str(), r.as_slice()))
        .collect();

    let mut options = test_options(SearchMode::BlastN);
    options.threads = 4;
    let queries = UnreadableStrand {
        inner: InMemoryQueryStore::new(records(&query_set), FrameScheme::Strands).unwrap(),
        broken: 5,
    };
    let references = InMemoryReferenceStore::new(records(&[("r", &reference[..])]), SequenceType::Dna).unwrap();

    let err = search(&options, &queries, &references).unwrap_err();
    assert!(matches!(err, SaltError::InvariantViolation(ref msg) if msg.contains("query 5")));
    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[test]
fn test_protein_reference_rejected_for_blastn() {
    let options = test_options(SearchMode::BlastN);
    let queries = InMemoryQueryStore::new(records(&[("q", &random_dna(100, 81)[..])]), FrameScheme::Strands).unwrap();
    let references =
        InMemoryReferenceStore::new(records(&[("p", &random_protein(100, 82)[..])]), SequenceType::Protein).unwrap();
    let err = search(&options, &queries, &references).unwrap_err();
    assert!(matches!(err, SaltError::IncompatibleSequenceType { .. }));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_query_frames_must_match_mode() {
    let options = test_options(SearchMode::BlastX);
    let queries = InMemoryQueryStore::new(records(&[("q", &random_dna(90, 91)[..])]), FrameScheme::Strands).unwrap();
    let references =
        InMemoryReferenceStore::new(records(&[("p", &random_protein(100, 92)[..])]), SequenceType::Protein).unwrap();
    assert!(matches!(
        search(&options, &queries, &references),
        Err(SaltError::IncompatibleSequenceType { .. })
    ));
}

#[test]
fn test_reference_shapes_must_match_options() {
    let reference = random_dna(400, 101);
    let read = reference[100..220].to_vec();
    let options = test_options(SearchMode::BlastN);
    let queries = InMemoryQueryStore::new(records(&[("q", &read[..])]), FrameScheme::Strands).unwrap();

    let mut other_shapes = options.shapes.clone();
    other_shapes.push(options.shapes[0].clone());
    let mismatched = IndexedReferences {
        inner: InMemoryReferenceStore::new(records(&[("r", &reference[..])]), SequenceType::Dna).unwrap(),
        shapes: other_shapes,
    };
    let err = search(&options, &queries, &mismatched).unwrap_err();
    assert!(matches!(err, SaltError::InvalidParameter { .. }));
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let matching = IndexedReferences {
        inner: InMemoryReferenceStore::new(records(&[("r", &reference[..])]), SequenceType::Dna).unwrap(),
        shapes: options.shapes.clone(),
    };
    let results = search(&options, &queries, &matching).unwrap();
    assert!(results.iter().any(|r| !r.matches.is_empty()));
}
