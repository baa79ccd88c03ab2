//! Unit tests for sequence/ and seed/location.rs

pub mod round_trip;
pub mod translation;
