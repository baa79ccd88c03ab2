//! Round trips of the sequence codec and the packed location word

use SALT::seed::location::{MAX_FRAMES, MAX_POSITIONS, MAX_SEQUENCES};
use SALT::seed::SeedLocation;
use SALT::sequence::{Alphabet, SequenceCodec};

use super::super::helpers::{random_dna, random_protein};

#[test]
fn test_dna_codec_round_trip() {
    let alphabet = Alphabet::dna();
    let codec = SequenceCodec::new(alphabet);
    for (i, length) in [0usize, 1, 20, 21, 22, 63, 64, 1000].into_iter().enumerate() {
        let mut residues = alphabet.encode(&random_dna(length, i as u64 + 1));
        if length > 3 {
            residues[length / 2] = alphabet.ambiguous();
        }
        let code = codec.encode(&residues);
        assert_eq!(codec.length(&code), length);
        assert_eq!(codec.decode(&code), residues);
    }
}

#[test]
fn test_protein_codec_round_trip() {
    let alphabet = Alphabet::protein();
    let codec = SequenceCodec::new(alphabet);
    let mut residues = alphabet.encode(&random_protein(301, 9));
    // X and stop take the two highest codes
    residues.extend(alphabet.encode(b"X*"));
    let code = codec.encode(&residues);
    assert_eq!(codec.decode(&code), residues);
    for (i, &r) in residues.iter().enumerate() {
        assert_eq!(codec.letter(&code, i), r);
    }
    assert_eq!(codec.letter(&code, residues.len() + 5), 0);
}

#[test]
fn test_decode_into_reuses_buffer() {
    let codec = SequenceCodec::new(Alphabet::dna());
    let mut buffer = vec![9u8; 100];
    codec.decode_into(&codec.encode(&[1, 2, 3]), &mut buffer);
    assert_eq!(buffer, vec![1, 2, 3]);
}

#[test]
fn test_location_round_trip_at_boundaries() {
    let max_id = (MAX_SEQUENCES - 1) as usize;
    let max_pos = (MAX_POSITIONS - 1) as usize;
    let max_frame = (MAX_FRAMES - 1) as usize;
    for (id, pos, frame) in [
        (0, 0, 0),
        (max_id, 0, 0),
        (0, max_pos, 0),
        (0, 0, max_frame),
        (max_id, max_pos, max_frame),
        (12345, 678, 5),
    ] {
        let loc = SeedLocation::new(id, pos, frame).unwrap();
        let back = SeedLocation::unpack(loc.pack());
        assert_eq!(back, loc);
        assert_eq!(
            (back.sequence_id as usize, back.position as usize, back.frame_rank as usize),
            (id, pos, frame)
        );
    }
}

#[test]
fn test_location_rejects_out_of_range() {
    assert!(SeedLocation::new(MAX_SEQUENCES as usize, 0, 0).is_err());
    assert!(SeedLocation::new(0, MAX_POSITIONS as usize, 0).is_err());
    assert!(SeedLocation::new(0, 0, MAX_FRAMES as usize).is_err());
}

#[test]
fn test_packed_order_follows_fields() {
    let a = SeedLocation::new(1, 500, 3).unwrap();
    let b = SeedLocation::new(2, 0, 0).unwrap();
    let c = SeedLocation::new(2, 0, 1).unwrap();
    assert!(a.pack() < b.pack());
    assert!(b.pack() < c.pack());
}
