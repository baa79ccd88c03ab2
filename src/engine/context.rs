//! Per-run state shared by every worker
//!
//! One `SearchContext` is built per run and handed to all jobs by reference.
//! Everything in it is either immutable or internally synchronized.

use std::sync::atomic::AtomicUsize;

use log::{debug, info};

use crate::config::SearchOptions;
use crate::diagnostics::PipelineCounters;
use crate::error::{Result, SaltError};
use crate::post::MatchStore;
use crate::seed::{Partitioner, ReferenceMasks, SeedMatcher, SeedShape};
use crate::stats::SearchStatistics;
use crate::store::{QueryStore, ReferenceStore};

/// Length used for a query's statistics and its integer score cutoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryCutoff {
    pub length: usize,
    pub raw_score: i32,
}

pub struct SearchContext<'a> {
    pub options: &'a SearchOptions,
    pub queries: &'a dyn QueryStore,
    pub references: &'a dyn ReferenceStore,
    pub statistics: SearchStatistics,
    pub partitioner: Partitioner,
    pub matcher: SeedMatcher,
    pub masks: ReferenceMasks,
    pub matches: MatchStore,
    pub counters: PipelineCounters,
    pub diagnostics: bool,
    cutoffs: Vec<QueryCutoff>,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        options: &'a SearchOptions,
        queries: &'a dyn QueryStore,
        references: &'a dyn ReferenceStore,
    ) -> Result<Self> {
        options.mode.check_reference_type(references.sequence_type())?;
        if queries.frame_scheme() != options.mode.frame_scheme() {
            return Err(SaltError::IncompatibleSequenceType {
                mode: options.mode.name().to_string(),
                expected: options.mode.frame_scheme().input_type().to_string(),
                found: queries.frame_scheme().input_type().to_string(),
            });
        }

        if let Some(shapes) = references.seed_shapes() {
            let stored: Vec<&str> = shapes.iter().map(SeedShape::pattern).collect();
            let configured: Vec<&str> = options.shapes.iter().map(SeedShape::pattern).collect();
            if stored != configured {
                return Err(SaltError::invalid_parameter(
                    "shapes",
                    format!(
                        "reference masks were built for {:?}, the search uses {:?}",
                        stored, configured
                    ),
                ));
            }
        }

        let params = SearchStatistics::params_for(
            &options.matrix,
            options.aligner.gap_open,
            options.aligner.gap_extend,
        );
        let statistics = SearchStatistics::new(
            params,
            references.total_length(),
            options.min_bit_score,
            options.max_expected,
        );
        info!(
            "{} search: {} queries x {} references ({} residues), lambda={:.3} K={:.3}",
            options.mode.name(),
            queries.sequence_count(),
            references.sequence_count(),
            references.total_length(),
            params.lambda,
            params.k
        );

        // frame 0 stands for every frame of a query: all frames of one
        // query share a length up to a residue
        let cutoffs = (0..queries.sequence_count())
            .map(|id| {
                let length = queries.residues(id, 0)?.len();
                Ok(QueryCutoff {
                    length,
                    raw_score: statistics.raw_cutoff(length),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        debug!("Raw score cutoffs computed for {} queries", cutoffs.len());

        Ok(Self {
            options,
            queries,
            references,
            statistics,
            partitioner: Partitioner::new(options.chunks, options.jobs)?,
            matcher: SeedMatcher::new(options.max_occurrences),
            masks: ReferenceMasks::new(),
            matches: MatchStore::new(options.selector),
            counters: PipelineCounters::default(),
            diagnostics: false,
            cutoffs,
        })
    }

    #[inline]
    pub fn cutoff(&self, query_id: usize) -> Result<QueryCutoff> {
        self.cutoffs.get(query_id).copied().ok_or_else(|| {
            SaltError::InvariantViolation(format!(
                "query id {} out of range (store holds {})",
                query_id,
                self.cutoffs.len()
            ))
        })
    }

    /// Bump a pipeline counter when diagnostics are on
    #[inline]
    pub fn count(&self, counter: fn(&PipelineCounters) -> &AtomicUsize) {
        if self.diagnostics {
            PipelineCounters::incr(counter(&self.counters));
        }
    }

    #[inline]
    pub fn count_n(&self, counter: fn(&PipelineCounters) -> &AtomicUsize, n: usize) {
        if self.diagnostics {
            PipelineCounters::add(counter(&self.counters), n);
        }
    }
}
