//! Output writers

pub mod writers;
