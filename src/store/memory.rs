//! FASTA-backed stores held entirely in memory

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use bio::io::fasta;
use log::{debug, warn};

use super::{QueryStore, ReferenceStore};
use crate::error::{Result, SaltError};
use crate::seed::location::{MAX_POSITIONS, MAX_SEQUENCES};
use crate::sequence::{Alphabet, FrameScheme, SequenceCode, SequenceCodec, SequenceType};

/// A named sequence as read from input (ASCII residues)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub name: String,
    pub residues: Vec<u8>,
}

impl SequenceRecord {
    pub fn new(name: impl Into<String>, residues: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            residues: residues.into(),
        }
    }
}

/// Read every record of a FASTA file; the name is the first word of the
/// header line
pub fn read_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<SequenceRecord>> {
    let reader = fasta::Reader::new(BufReader::new(File::open(path.as_ref())?));
    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(SequenceRecord::new(record.id(), record.seq()));
    }
    debug!("Read {} sequences from {}", records.len(), path.as_ref().display());
    Ok(records)
}

/// DNA when every letter is a nucleotide or N, protein otherwise
pub fn guess_sequence_type(records: &[SequenceRecord]) -> SequenceType {
    let nucleotide = |c: &u8| matches!(c.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T' | b'U' | b'N');
    if records.iter().all(|r| r.residues.iter().all(nucleotide)) {
        SequenceType::Dna
    } else {
        SequenceType::Protein
    }
}

fn check_sequence_count(count: usize) -> Result<()> {
    if count as u64 >= MAX_SEQUENCES {
        return Err(SaltError::LocationOutOfRange {
            field: "sequence id",
            value: count as u64,
            limit: MAX_SEQUENCES,
        });
    }
    Ok(())
}

fn check_length(length: usize) -> Result<()> {
    if length as u64 >= MAX_POSITIONS {
        return Err(SaltError::LocationOutOfRange {
            field: "position",
            value: length as u64,
            limit: MAX_POSITIONS,
        });
    }
    Ok(())
}

fn out_of_range(what: &str, id: usize, count: usize) -> SaltError {
    SaltError::InvariantViolation(format!("{} id {} out of range (store holds {})", what, id, count))
}

/// Residue codes plus their packed form
#[derive(Debug, Clone)]
struct StoredSequence {
    code: SequenceCode,
    residues: Vec<u8>,
}

impl StoredSequence {
    fn new(codec: &SequenceCodec, residues: Vec<u8>) -> Self {
        Self {
            code: codec.encode(&residues),
            residues,
        }
    }
}

#[derive(Debug)]
pub struct InMemoryReferenceStore {
    sequence_type: SequenceType,
    names: Vec<String>,
    sequences: Vec<StoredSequence>,
    total_length: u64,
}

impl InMemoryReferenceStore {
    pub fn new(records: Vec<SequenceRecord>, sequence_type: SequenceType) -> Result<Self> {
        check_sequence_count(records.len())?;
        let alphabet = Alphabet::for_type(sequence_type);
        let codec = SequenceCodec::new(alphabet);
        let mut names = Vec::with_capacity(records.len());
        let mut sequences = Vec::with_capacity(records.len());
        let mut total_length = 0u64;
        for record in records {
            check_length(record.residues.len())?;
            if record.residues.is_empty() {
                warn!("Reference '{}' is empty", record.name);
            }
            total_length += record.residues.len() as u64;
            sequences.push(StoredSequence::new(&codec, alphabet.encode(&record.residues)));
            names.push(record.name);
        }
        Ok(Self {
            sequence_type,
            names,
            sequences,
            total_length,
        })
    }

    /// Load a FASTA file, guessing the sequence type from its contents
    pub fn from_fasta<P: AsRef<Path>>(path: P) -> Result<Self> {
        let records = read_fasta(path)?;
        let sequence_type = guess_sequence_type(&records);
        Self::new(records, sequence_type)
    }

    fn get(&self, id: usize) -> Result<&StoredSequence> {
        self.sequences
            .get(id)
            .ok_or_else(|| out_of_range("reference", id, self.sequences.len()))
    }
}

impl ReferenceStore for InMemoryReferenceStore {
    fn sequence_type(&self) -> SequenceType {
        self.sequence_type
    }

    fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    fn sequence_code(&self, id: usize) -> Result<&SequenceCode> {
        Ok(&self.get(id)?.code)
    }

    fn residues(&self, id: usize) -> Result<&[u8]> {
        Ok(&self.get(id)?.residues)
    }

    fn name(&self, id: usize) -> Result<&str> {
        self.names
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| out_of_range("reference", id, self.names.len()))
    }

    fn total_length(&self) -> u64 {
        self.total_length
    }
}

#[derive(Debug)]
pub struct InMemoryQueryStore {
    scheme: FrameScheme,
    names: Vec<String>,
    lengths: Vec<usize>,
    frames: Vec<Vec<StoredSequence>>,
}

impl InMemoryQueryStore {
    /// Build every frame of every query up front
    pub fn new(records: Vec<SequenceRecord>, scheme: FrameScheme) -> Result<Self> {
        check_sequence_count(records.len())?;
        let alphabet = Alphabet::for_type(scheme.frame_type());
        let codec = SequenceCodec::new(alphabet);
        let mut names = Vec::with_capacity(records.len());
        let mut lengths = Vec::with_capacity(records.len());
        let mut frames = Vec::with_capacity(records.len());
        for record in records {
            check_length(record.residues.len())?;
            let stored = scheme
                .frames(&record.residues)
                .iter()
                .map(|frame| StoredSequence::new(&codec, alphabet.encode(frame)))
                .collect();
            frames.push(stored);
            lengths.push(record.residues.len());
            names.push(record.name);
        }
        Ok(Self {
            scheme,
            names,
            lengths,
            frames,
        })
    }

    pub fn from_fasta<P: AsRef<Path>>(path: P, scheme: FrameScheme) -> Result<Self> {
        Self::new(read_fasta(path)?, scheme)
    }

    fn get(&self, id: usize, frame_rank: usize) -> Result<&StoredSequence> {
        self.frames
            .get(id)
            .ok_or_else(|| out_of_range("query", id, self.frames.len()))?
            .get(frame_rank)
            .ok_or_else(|| {
                SaltError::InvariantViolation(format!(
                    "frame rank {} out of range for query {}",
                    frame_rank, id
                ))
            })
    }
}

impl QueryStore for InMemoryQueryStore {
    fn sequence_count(&self) -> usize {
        self.frames.len()
    }

    fn frame_scheme(&self) -> FrameScheme {
        self.scheme
    }

    fn sequence_code(&self, id: usize, frame_rank: usize) -> Result<&SequenceCode> {
        Ok(&self.get(id, frame_rank)?.code)
    }

    fn residues(&self, id: usize, frame_rank: usize) -> Result<&[u8]> {
        Ok(&self.get(id, frame_rank)?.residues)
    }

    fn name(&self, id: usize) -> Result<&str> {
        self.names
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| out_of_range("query", id, self.names.len()))
    }

    fn original_length(&self, id: usize) -> Result<usize> {
        self.lengths
            .get(id)
            .copied()
            .ok_or_else(|| out_of_range("query", id, self.lengths.len()))
    }
}
