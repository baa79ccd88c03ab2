//! The seed-and-extend pipeline
//!
//! For every seed shape and every chunk of seed space:
//!
//! 1. build: query and reference seeds of the chunk are appended to one
//!    bucket per job (each bucket behind its own lock);
//! 2. sort: every bucket is radix sorted;
//! 3. match: per job, the query and reference buckets are merge-joined and
//!    each seed pair goes through the extension filter, the banded aligner
//!    and the match selector.
//!
//! With a mask threshold, a masking pass over all shapes and chunks runs
//! first so that every main pass sees complete repeat masks.

use std::ops::Range;

use indicatif::ProgressBar;
use log::{debug, info};

use super::context::SearchContext;
use super::locks::BucketLocks;
use super::scheduler::JobScheduler;
use crate::align::{BandedAligner, Match, SeedAnchor};
use crate::config::SearchOptions;
use crate::diagnostics::{diagnostics_enabled, PipelineCounters};
use crate::error::{Result, SaltError};
use crate::extension::{ExtensionFilter, FilterOutcome, Rejection};
use crate::post::{Insertion, SelectRejection};
use crate::seed::mask::mask_repeats;
use crate::seed::{SeedEntry, SeedIndexStore, SeedLocation, SeedShape};
use crate::store::{QueryStore, ReferenceStore};

/// Entries buffered per job before taking the bucket lock
const FLUSH_SIZE: usize = 1 << 12;

/// Build units per worker thread
const UNITS_PER_THREAD: usize = 4;

/// Retained matches of one query, best first
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub query_id: u32,
    pub matches: Vec<Match>,
}

pub struct SearchOutcome {
    pub results: Vec<QueryResult>,
    pub counters: PipelineCounters,
}

type Buckets = BucketLocks<SeedIndexStore>;

/// Split `0..count` into at most `parts` contiguous, non-empty ranges
fn split_ranges(count: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.clamp(1, count.max(1));
    let size = count.div_ceil(parts).max(1);
    (0..count).step_by(size).map(|start| start..(start + size).min(count)).collect()
}

/// Number of windows of `shape` that fit a sequence of `length`
#[inline]
fn window_count(length: usize, shape: &SeedShape) -> usize {
    (length + 1).saturating_sub(shape.length())
}

pub struct SearchEngine<'a> {
    ctx: SearchContext<'a>,
    scheduler: JobScheduler,
    progress: ProgressBar,
}

impl<'a> SearchEngine<'a> {
    pub fn new(
        options: &'a SearchOptions,
        queries: &'a dyn QueryStore,
        references: &'a dyn ReferenceStore,
    ) -> Result<Self> {
        let mut ctx = SearchContext::new(options, queries, references)?;
        ctx.diagnostics = options.verbose || diagnostics_enabled();
        Ok(Self {
            ctx,
            scheduler: JobScheduler::new(options.threads)?,
            progress: ProgressBar::hidden(),
        })
    }

    /// Tick `bar` once per (shape, chunk) pass
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = bar;
        self
    }

    /// Force pipeline counters on or off
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.ctx.diagnostics = enabled;
        self
    }

    pub fn run(self) -> Result<SearchOutcome> {
        let options = self.ctx.options;
        let passes = options.shapes.len() * options.chunks;
        self.progress.set_length(passes as u64);

        if let Some(threshold) = options.mask_threshold {
            for shape in &options.shapes {
                for chunk in 0..options.chunks {
                    self.mask_pass(shape, chunk, threshold)?;
                }
            }
            info!("Masked {} reference seed positions", self.ctx.masks.masked_positions());
        }

        for shape in &options.shapes {
            for chunk in 0..options.chunks {
                self.search_pass(shape, chunk)?;
                self.progress.inc(1);
            }
        }
        self.progress.finish_and_clear();

        let SearchEngine { ctx, .. } = self;
        if ctx.diagnostics {
            ctx.counters.log_summary();
        }
        let results: Vec<QueryResult> = ctx
            .matches
            .into_results()
            .into_iter()
            .map(|(query_id, matches)| QueryResult { query_id, matches })
            .collect();
        info!(
            "{} queries with matches, {} matches in total",
            results.len(),
            results.iter().map(|r| r.matches.len()).sum::<usize>()
        );
        Ok(SearchOutcome {
            results,
            counters: ctx.counters,
        })
    }

    fn new_buckets(&self, shape: &SeedShape, approx_total: usize) -> Buckets {
        let jobs = self.ctx.partitioner.jobs();
        let per_bucket = approx_total / (jobs * self.ctx.partitioner.chunks());
        BucketLocks::new((0..jobs).map(|_| {
            let mut store = SeedIndexStore::new(shape.bits_per_letter());
            store.reserve(per_bucket);
            store
        }))
    }

    /// Append buffered entries to their buckets
    fn flush(buckets: &Buckets, buffers: &mut [Vec<SeedEntry>]) -> Result<()> {
        for (job, buffer) in buffers.iter_mut().enumerate() {
            if !buffer.is_empty() {
                buckets.lock(job).append(buffer)?;
            }
        }
        Ok(())
    }

    /// Route the good seeds of one sequence frame into per-job buffers,
    /// flushing full buffers into the buckets
    #[allow(clippy::too_many_arguments)]
    fn collect_seeds(
        &self,
        shape: &SeedShape,
        chunk: usize,
        residues: &[u8],
        location: impl Fn(usize) -> Result<SeedLocation>,
        skip: impl Fn(usize) -> bool,
        buckets: &Buckets,
        buffers: &mut [Vec<SeedEntry>],
    ) -> Result<usize> {
        let reduction = &self.ctx.options.reduction;
        let mut added = 0;
        for pos in 0..window_count(residues.len(), shape) {
            let Some(code) = shape.good_seed_at(reduction, residues, pos) else {
                continue;
            };
            let (seed_chunk, job) = self.ctx.partitioner.route(code);
            if seed_chunk != chunk || skip(pos) {
                continue;
            }
            buffers[job].push(SeedEntry::new(code, location(pos)?));
            added += 1;
            if buffers[job].len() >= FLUSH_SIZE {
                buckets.lock(job).append(&mut buffers[job])?;
            }
        }
        Ok(added)
    }

    fn build_query_buckets(&self, shape: &SeedShape, chunk: usize) -> Result<Buckets> {
        let queries = self.ctx.queries;
        let frames = queries.number_of_frames();
        let approx: usize = (0..queries.sequence_count())
            .map(|id| queries.residues(id, 0).map(|r| r.len() * frames))
            .sum::<Result<usize>>()?;
        let buckets = self.new_buckets(shape, approx);
        let units = split_ranges(
            queries.sequence_count(),
            self.scheduler.threads() * UNITS_PER_THREAD,
        );

        self.scheduler.run_phase("query seeds", units.len(), |unit| {
            let mut buffers = vec![Vec::new(); buckets.len()];
            let mut added = 0;
            for id in units[unit].clone() {
                self.scheduler.token().check()?;
                for frame in 0..frames {
                    let residues = queries.residues(id, frame)?;
                    added += self.collect_seeds(
                        shape,
                        chunk,
                        residues,
                        |pos| SeedLocation::new(id, pos, frame),
                        |_| false,
                        &buckets,
                        &mut buffers,
                    )?;
                }
            }
            Self::flush(&buckets, &mut buffers)?;
            self.ctx.count_n(|c| &c.query_seeds, added);
            Ok(())
        })?;
        Ok(buckets)
    }

    fn build_reference_buckets(&self, shape: &SeedShape, chunk: usize, apply_masks: bool) -> Result<Buckets> {
        let references = self.ctx.references;
        let buckets = self.new_buckets(shape, references.total_length() as usize);
        let units = split_ranges(
            references.sequence_count(),
            self.scheduler.threads() * UNITS_PER_THREAD,
        );

        self.scheduler.run_phase("reference seeds", units.len(), |unit| {
            let mut buffers = vec![Vec::new(); buckets.len()];
            let mut added = 0;
            for id in units[unit].clone() {
                self.scheduler.token().check()?;
                let residues = references.residues(id)?;
                let stored = references.mask(id, shape.id());
                let repeats = if apply_masks {
                    self.ctx.masks.mask_of(id as u32, shape.id())
                } else {
                    None
                };
                added += self.collect_seeds(
                    shape,
                    chunk,
                    residues,
                    |pos| SeedLocation::new(id, pos, 0),
                    |pos| {
                        stored.is_some_and(|m| m.get(pos))
                            || repeats.as_ref().is_some_and(|m| m.get(pos))
                    },
                    &buckets,
                    &mut buffers,
                )?;
            }
            Self::flush(&buckets, &mut buffers)?;
            self.ctx.count_n(|c| &c.reference_seeds, added);
            Ok(())
        })?;
        Ok(buckets)
    }

    fn sort_buckets(&self, sets: &[&Buckets]) -> Result<()> {
        let jobs = self.ctx.partitioner.jobs();
        self.scheduler.run_phase("sort", sets.len() * jobs, |unit| {
            sets[unit / jobs].lock(unit % jobs).sort();
            Ok(())
        })
    }

    /// Mark over-represented reference seeds of one (shape, chunk)
    fn mask_pass(&self, shape: &SeedShape, chunk: usize, threshold: usize) -> Result<()> {
        let references = self.build_reference_buckets(shape, chunk, false)?;
        self.sort_buckets(&[&references])?;
        self.scheduler.run_phase("mask", references.len(), |job| {
            let bucket = references.lock(job);
            let masked = mask_repeats(bucket.entries(), threshold, shape.id(), &self.ctx.masks);
            self.ctx.count_n(|c| &c.masked_codes, masked);
            Ok(())
        })
    }

    fn search_pass(&self, shape: &SeedShape, chunk: usize) -> Result<()> {
        let queries = self.build_query_buckets(shape, chunk)?;
        let references = self.build_reference_buckets(shape, chunk, true)?;
        self.sort_buckets(&[&queries, &references])?;
        debug!(
            "Shape {} chunk {}: {} query seeds, {} reference seeds",
            shape.id(),
            chunk,
            (0..queries.len()).map(|j| queries.lock(j).len()).sum::<usize>(),
            (0..references.len()).map(|j| references.lock(j).len()).sum::<usize>()
        );

        self.scheduler.run_phase("match", queries.len(), |job| {
            self.match_job(shape, &queries, &references, job)
        })
    }

    fn match_job(&self, shape: &SeedShape, queries: &Buckets, references: &Buckets, job: usize) -> Result<()> {
        let options = self.ctx.options;
        let masks = options.mask_threshold.map(|_| &self.ctx.masks);
        let filter = ExtensionFilter::new(
            &options.shapes,
            &options.reduction,
            masks,
            &options.matrix,
            options.filter,
        );
        let mut aligner = BandedAligner::new(&options.matrix, options.aligner);

        let query_bucket = queries.lock(job);
        let reference_bucket = references.lock(job);
        let stats = self.ctx.matcher.for_each_pair(
            query_bucket.entries(),
            reference_bucket.entries(),
            |q, r| self.extend_pair(shape, &filter, &mut aligner, q, r),
        )?;
        self.ctx.count_n(|c| &c.seed_pairs, stats.pairs);
        self.ctx.count_n(|c| &c.capped_codes, stats.capped_codes);
        Ok(())
    }

    /// Filter, align and offer one seed pair to the match store
    fn extend_pair(
        &self,
        shape: &SeedShape,
        filter: &ExtensionFilter<'_>,
        aligner: &mut BandedAligner<'_>,
        q_entry: &SeedEntry,
        r_entry: &SeedEntry,
    ) -> Result<()> {
        self.scheduler.token().check()?;
        let ctx = &self.ctx;
        let q_loc = q_entry.location();
        let r_loc = r_entry.location();
        let query_id = q_loc.sequence_id as usize;
        let frame = q_loc.frame_rank as usize;
        let query = ctx.queries.residues(query_id, frame)?;
        let reference = ctx.references.residues(r_loc.sequence_id as usize)?;
        let (q_pos, r_pos) = (q_loc.position as usize, r_loc.position as usize);

        match filter.evaluate(shape, query, q_pos, reference, r_loc.sequence_id, r_pos) {
            FilterOutcome::Passed(_) => {}
            FilterOutcome::Rejected(Rejection::SeedIdentity) => {
                ctx.count(|c| &c.identity_rejected);
                return Ok(());
            }
            FilterOutcome::Rejected(Rejection::NotLeftmost) => {
                ctx.count(|c| &c.not_leftmost);
                return Ok(());
            }
            FilterOutcome::Rejected(Rejection::UngappedScore) => {
                ctx.count(|c| &c.ungapped_rejected);
                return Ok(());
            }
        }

        ctx.count(|c| &c.dp_alignments);
        let anchor = SeedAnchor::new(q_pos, r_pos, shape.length());
        let Some(score) = aligner.compute_score(query, reference, anchor) else {
            ctx.count(|c| &c.dp_no_alignment);
            return Ok(());
        };
        let cutoff = ctx.cutoff(query_id)?;
        if score < cutoff.raw_score {
            ctx.count(|c| &c.score_rejected);
            return Ok(());
        }
        let Some((bit_score, expected)) = ctx.statistics.accepts(score, cutoff.length) else {
            ctx.count(|c| &c.score_rejected);
            return Ok(());
        };
        if !ctx.matches.has_room_for(q_loc.sequence_id, score) {
            ctx.count(|c| &c.no_room);
            return Ok(());
        }

        let alignment = aligner.traceback(query, reference).ok_or_else(|| {
            SaltError::InvariantViolation("traceback requested without a scored alignment".to_string())
        })?;
        ctx.count(|c| &c.tracebacks);
        let query_range = ctx
            .queries
            .to_original(query_id, frame, alignment.q_start, alignment.q_end)?;
        let candidate = Match::new(
            q_loc.sequence_id,
            q_loc.frame_rank,
            r_loc.sequence_id,
            bit_score,
            expected,
            alignment,
            query_range,
        );
        match ctx.matches.insert(candidate) {
            Insertion::Kept { .. } => ctx.count(|c| &c.kept),
            Insertion::Rejected(SelectRejection::Identity) => ctx.count(|c| &c.identity_filtered),
            Insertion::Rejected(_) => ctx.count(|c| &c.selector_rejected),
        }
        Ok(())
    }
}

/// Run a complete search
pub fn search(
    options: &SearchOptions,
    queries: &dyn QueryStore,
    references: &dyn ReferenceStore,
) -> Result<Vec<QueryResult>> {
    Ok(SearchEngine::new(options, queries, references)?.run()?.results)
}
