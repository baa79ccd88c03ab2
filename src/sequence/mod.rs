//! Sequence representation
//!
//! Residue alphabets and seed reductions, the packed sequence codec, and the
//! frame schemes used to present queries to the seed index.

pub mod alphabet;
pub mod codec;
pub mod translation;

pub use alphabet::{Alphabet, Reduction, SequenceType};
pub use codec::{SequenceCode, SequenceCodec};
pub use translation::FrameScheme;
