//! Frame schemes and coordinate mapping

use SALT::sequence::translation::translate;
use SALT::sequence::FrameScheme;

use super::super::helpers::{back_translate, random_protein};

#[test]
fn test_back_translation_round_trip() {
    let protein = random_protein(50, 3);
    assert_eq!(translate(&back_translate(&protein)), protein);
}

#[test]
fn test_strand_coordinates() {
    let scheme = FrameScheme::Strands;
    assert_eq!(scheme.to_original(0, 0, 10, 100), (1, 10));
    // reverse complement position 0 is the last base of the original
    assert_eq!(scheme.to_original(1, 0, 10, 100), (100, 91));
}

#[test]
fn test_six_frame_coordinates() {
    let scheme = FrameScheme::SixFrames;
    assert_eq!(scheme.to_original(0, 0, 100, 300), (1, 300));
    assert_eq!(scheme.to_original(1, 2, 4, 300), (8, 13));
    assert_eq!(scheme.to_original(3, 0, 2, 300), (300, 295));
    assert_eq!(scheme.to_original(5, 0, 1, 300), (298, 296));
}

#[test]
fn test_frame_counts() {
    let seq = b"ATGGCCAAATTTGGGCCC";
    assert_eq!(FrameScheme::Identity.frames(seq).len(), 1);
    let strands = FrameScheme::Strands.frames(seq);
    assert_eq!(strands[1], b"GGGCCCAAATTTGGCCAT".to_vec());
    let six = FrameScheme::SixFrames.frames(seq);
    assert_eq!(six.len(), 6);
    assert_eq!(six[0], b"MAKFGP".to_vec());
    assert_eq!(six[1].len(), 5);
}
