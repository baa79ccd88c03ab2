//! Karlin-Altschul statistics: bit scores, E-values and raw-score cutoffs

pub mod karlin;
pub mod tables;

pub use karlin::*;
pub use tables::*;
