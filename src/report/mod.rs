//! Match writers
//!
//! Writers receive the retained matches of one query at a time, best first.
//! Everything they need besides the matches (sequence names, residues for the
//! alignment text, the alphabet and matrix) comes from a [`ReportContext`].

pub mod pairwise;
pub mod tabular;

use std::io::Write;

use crate::engine::QueryResult;
use crate::error::{Result, SaltError};
use crate::sequence::{Alphabet, FrameScheme};
use crate::store::{QueryStore, ReferenceStore};
use crate::utils::matrix::ScoringMatrix;

pub use pairwise::PairwiseWriter;
pub use tabular::TabularWriter;

/// Output format selected with `--outfmt`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// 0 = pairwise alignment view
    Pairwise,
    /// 6 = tab-separated, 12 columns
    #[default]
    Tabular,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim() {
            "0" => Ok(OutputFormat::Pairwise),
            "6" => Ok(OutputFormat::Tabular),
            other => Err(SaltError::invalid_parameter(
                "outfmt",
                format!("unsupported output format '{}' (supported: 0, 6)", other),
            )),
        }
    }
}

/// Read-only view of the inputs of a finished search
pub struct ReportContext<'a> {
    pub queries: &'a dyn QueryStore,
    pub references: &'a dyn ReferenceStore,
    pub matrix: &'a ScoringMatrix,
}

impl ReportContext<'_> {
    pub fn frame_scheme(&self) -> FrameScheme {
        self.queries.frame_scheme()
    }

    /// Alphabet of the searched frames (and of the references)
    pub fn alphabet(&self) -> &'static Alphabet {
        Alphabet::for_type(self.frame_scheme().frame_type())
    }
}

/// Serializes search results
pub trait MatchWriter {
    /// Write every match of one query
    fn write_query(&mut self, ctx: &ReportContext<'_>, result: &QueryResult) -> Result<()>;

    /// Flush buffered output
    fn finish(&mut self) -> Result<()>;
}

/// Writer for `format` over `out`
pub fn writer_for<'w, W: Write + 'w>(format: OutputFormat, out: W) -> Box<dyn MatchWriter + 'w> {
    match format {
        OutputFormat::Pairwise => Box::new(PairwiseWriter::new(out)),
        OutputFormat::Tabular => Box::new(TabularWriter::new(out)),
    }
}

/// Write all results with one writer
pub fn write_results(
    writer: &mut dyn MatchWriter,
    ctx: &ReportContext<'_>,
    results: &[QueryResult],
) -> Result<()> {
    for result in results {
        writer.write_query(ctx, result)?;
    }
    writer.finish()
}

/// Scientific notation with a signed, two-digit exponent (`1.5e-05`)
fn format_scientific(value: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, value);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => raw,
    }
}

/// Expected value as BLAST prints it
pub fn format_expected(expected: f64) -> String {
    if expected < 1.0e-180 {
        "0.0".to_string()
    } else if expected < 0.0009 {
        format_scientific(expected, 2)
    } else if expected < 0.1 {
        format!("{:.3}", expected)
    } else if expected < 1.0 {
        format!("{:.2}", expected)
    } else if expected < 10.0 {
        format!("{:.1}", expected)
    } else {
        format!("{:.0}", expected)
    }
}

/// Bit score as BLAST prints it
pub fn format_bit_score(bit_score: f64) -> String {
    if bit_score > 99999.0 {
        format_scientific(bit_score, 3)
    } else if bit_score > 99.9 {
        format!("{:.0}", bit_score)
    } else {
        format!("{:.1}", bit_score)
    }
}
