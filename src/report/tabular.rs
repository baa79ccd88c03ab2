//! Tab-separated output (outfmt 6)
//!
//! Columns: qseqid sseqid pident length mismatch gapopen qstart qend sstart
//! send evalue bitscore

use std::io::{BufWriter, Write};

use super::{format_bit_score, format_expected, MatchWriter, ReportContext};
use crate::align::Match;
use crate::engine::QueryResult;
use crate::error::Result;

pub struct TabularWriter<W: Write> {
    out: BufWriter<W>,
}

impl<W: Write> TabularWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: BufWriter::new(out),
        }
    }

    fn write_match(&mut self, query_name: &str, reference_name: &str, m: &Match) -> Result<()> {
        let stats = &m.alignment.stats;
        let (q_start, q_end) = m.query_range;
        let (r_start, r_end) = m.reference_range();
        writeln!(
            self.out,
            "{}\t{}\t{:.3}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            query_name,
            reference_name,
            m.percent_identity(),
            stats.length,
            stats.mismatches,
            stats.gap_opens,
            q_start,
            q_end,
            r_start,
            r_end,
            format_expected(m.expected),
            format_bit_score(m.bit_score)
        )?;
        Ok(())
    }
}

impl<W: Write> MatchWriter for TabularWriter<W> {
    fn write_query(&mut self, ctx: &ReportContext<'_>, result: &QueryResult) -> Result<()> {
        let query_name = ctx.queries.name(result.query_id as usize)?;
        for m in &result.matches {
            let reference_name = ctx.references.name(m.reference_id as usize)?;
            self.write_match(query_name, reference_name, m)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
