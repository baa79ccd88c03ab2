//! Pairwise alignment view (outfmt 0)
//!
//! ```text
//! Query= read_17
//! Length=150
//!
//! >chr2
//! Length=5000
//!
//!  Score = 52.8 bits (28),  Expect = 3.2e-07
//!  Identities = 28/30 (93%), Gaps = 0/30 (0%)
//!  Strand = Plus/Plus
//!
//! Query  11    ACGTTGCAACGTTGCAACGTTGCAACGTTG  40
//!              |||||||||||||| |||||||||||| ||
//! Sbjct  101   ACGTTGCAACGTTGAAACGTTGCAACGTAG  130
//! ```

use std::io::{BufWriter, Write};

use super::{format_bit_score, format_expected, MatchWriter, ReportContext};
use crate::align::{AlignmentText, Match};
use crate::engine::QueryResult;
use crate::error::Result;
use crate::sequence::{FrameScheme, SequenceType};

/// Residues per alignment row
pub const DEFAULT_LINE_LENGTH: usize = 60;

pub struct PairwiseWriter<W: Write> {
    out: BufWriter<W>,
    line_length: usize,
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

impl<W: Write> PairwiseWriter<W> {
    pub fn new(out: W) -> Self {
        Self::with_line_length(out, DEFAULT_LINE_LENGTH)
    }

    pub fn with_line_length(out: W, line_length: usize) -> Self {
        Self {
            out: BufWriter::new(out),
            line_length: line_length.max(1),
        }
    }

    fn write_scores(&mut self, ctx: &ReportContext<'_>, m: &Match, text: &AlignmentText) -> Result<()> {
        let stats = &m.alignment.stats;
        let length = stats.length;
        writeln!(
            self.out,
            " Score = {} bits ({}),  Expect = {}",
            format_bit_score(m.bit_score),
            m.raw_score(),
            format_expected(m.expected)
        )?;
        if ctx.alphabet().sequence_type() == SequenceType::Protein {
            let positives = text.midline.bytes().filter(|&c| c != b' ').count();
            writeln!(
                self.out,
                " Identities = {}/{} ({:.0}%), Positives = {}/{} ({:.0}%), Gaps = {}/{} ({:.0}%)",
                stats.identities,
                length,
                percent(stats.identities, length),
                positives,
                length,
                percent(positives, length),
                stats.gaps,
                length,
                percent(stats.gaps, length)
            )?;
        } else {
            writeln!(
                self.out,
                " Identities = {}/{} ({:.0}%), Gaps = {}/{} ({:.0}%)",
                stats.identities,
                length,
                percent(stats.identities, length),
                stats.gaps,
                length,
                percent(stats.gaps, length)
            )?;
        }
        let scheme = ctx.frame_scheme();
        match scheme {
            FrameScheme::Identity => {}
            FrameScheme::Strands => {
                let strand = if scheme.label(m.frame_rank as usize) > 0 { "Plus" } else { "Minus" };
                writeln!(self.out, " Strand = Plus/{}", strand)?;
            }
            FrameScheme::SixFrames => {
                writeln!(self.out, " Frame = {:+}", scheme.label(m.frame_rank as usize))?;
            }
        }
        writeln!(self.out)?;
        Ok(())
    }

    /// Rows of `line_length` columns; query positions are reported on the
    /// original query, reference positions 1-based
    fn write_rows(&mut self, ctx: &ReportContext<'_>, m: &Match, text: &AlignmentText) -> Result<()> {
        let (q_first, q_last) = m.query_range;
        let (r_first, r_last) = m.reference_range();
        let width = q_first.max(q_last).max(r_last).to_string().len();
        let (q_track, mid_track, r_track) = (
            text.query.as_bytes(),
            text.midline.as_bytes(),
            text.reference.as_bytes(),
        );

        let mut q_frame = m.alignment.q_start;
        let mut r_pos = r_first;
        let mut offset = 0;
        while offset < q_track.len() {
            let end = (offset + self.line_length).min(q_track.len());
            let q_row = &q_track[offset..end];
            let r_row = &r_track[offset..end];
            let q_residues = q_row.iter().filter(|&&c| c != b'-').count();
            let r_residues = r_row.iter().filter(|&&c| c != b'-').count();

            let (q_from, q_to) = ctx.queries.to_original(
                m.query_id as usize,
                m.frame_rank as usize,
                q_frame,
                q_frame + q_residues,
            )?;
            let r_to = (r_pos + r_residues).saturating_sub(1).max(r_pos);

            writeln!(
                self.out,
                "Query  {:<width$}  {}  {}",
                q_from,
                String::from_utf8_lossy(q_row),
                q_to,
                width = width
            )?;
            writeln!(
                self.out,
                "       {:<width$}  {}",
                "",
                String::from_utf8_lossy(&mid_track[offset..end]),
                width = width
            )?;
            writeln!(
                self.out,
                "Sbjct  {:<width$}  {}  {}",
                r_pos,
                String::from_utf8_lossy(r_row),
                r_to,
                width = width
            )?;
            writeln!(self.out)?;

            q_frame += q_residues;
            r_pos += r_residues;
            offset = end;
        }
        Ok(())
    }
}

impl<W: Write> MatchWriter for PairwiseWriter<W> {
    fn write_query(&mut self, ctx: &ReportContext<'_>, result: &QueryResult) -> Result<()> {
        let query_id = result.query_id as usize;
        writeln!(self.out, "Query= {}", ctx.queries.name(query_id)?)?;
        writeln!(self.out, "Length={}", ctx.queries.original_length(query_id)?)?;
        writeln!(self.out)?;

        for m in &result.matches {
            let reference_id = m.reference_id as usize;
            let reference = ctx.references.residues(reference_id)?;
            let query = ctx.queries.residues(query_id, m.frame_rank as usize)?;
            let text = m.text(query, reference, ctx.alphabet(), ctx.matrix);

            writeln!(self.out, ">{}", ctx.references.name(reference_id)?)?;
            writeln!(self.out, "Length={}", reference.len())?;
            writeln!(self.out)?;
            self.write_scores(ctx, m, text)?;
            self.write_rows(ctx, m, text)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
