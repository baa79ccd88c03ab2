//! Pipeline counters
//!
//! Track where seed hits are lost on their way to the final match set.
//! Enabled with the SALT_DIAGNOSTICS environment variable or `--verbose`.

use std::sync::atomic::{AtomicUsize, Ordering};

use log::info;

/// Check if diagnostics are enabled via environment variable
pub fn diagnostics_enabled() -> bool {
    std::env::var("SALT_DIAGNOSTICS")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Relaxed counters, one per pipeline stage
#[derive(Debug, Default)]
pub struct PipelineCounters {
    // Index stage
    pub query_seeds: AtomicUsize,
    pub reference_seeds: AtomicUsize,
    pub masked_codes: AtomicUsize,
    // Seed matching
    pub seed_pairs: AtomicUsize,
    pub capped_codes: AtomicUsize,
    // Extension filter
    pub identity_rejected: AtomicUsize,
    pub not_leftmost: AtomicUsize,
    pub ungapped_rejected: AtomicUsize,
    // Gapped alignment
    pub dp_alignments: AtomicUsize,
    pub dp_no_alignment: AtomicUsize,
    pub score_rejected: AtomicUsize,
    pub no_room: AtomicUsize,
    pub tracebacks: AtomicUsize,
    // Selection
    pub identity_filtered: AtomicUsize,
    pub selector_rejected: AtomicUsize,
    pub kept: AtomicUsize,
}

impl PipelineCounters {
    #[inline]
    pub fn add(counter: &AtomicUsize, n: usize) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub fn incr(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::Relaxed)
    }

    /// Log every counter at info level
    pub fn log_summary(&self) {
        info!("=== Pipeline diagnostics ===");
        info!("Index:");
        info!("  Query seeds:                {}", Self::get(&self.query_seeds));
        info!("  Reference seeds:            {}", Self::get(&self.reference_seeds));
        info!("  Masked seed codes:          {}", Self::get(&self.masked_codes));
        info!("Seed matching:");
        info!("  Seed pairs enumerated:      {}", Self::get(&self.seed_pairs));
        info!("  Occurrence-capped codes:    {}", Self::get(&self.capped_codes));
        info!("Extension filter:");
        info!("  Failed identity gate:       {}", Self::get(&self.identity_rejected));
        info!("  Not leftmost:               {}", Self::get(&self.not_leftmost));
        info!("  Ungapped score too low:     {}", Self::get(&self.ungapped_rejected));
        info!("Gapped alignment:");
        info!("  Banded DP runs:             {}", Self::get(&self.dp_alignments));
        info!("  No alignment:               {}", Self::get(&self.dp_no_alignment));
        info!("  Below score cutoff:         {}", Self::get(&self.score_rejected));
        info!("  No room in match set:       {}", Self::get(&self.no_room));
        info!("  Tracebacks:                 {}", Self::get(&self.tracebacks));
        info!("Selection:");
        info!("  Identity filtered:          {}", Self::get(&self.identity_filtered));
        info!("  Rejected by selector:       {}", Self::get(&self.selector_rejected));
        info!("  Kept (before displacement): {}", Self::get(&self.kept));
    }
}
