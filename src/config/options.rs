//! Validated run configuration
//!
//! `SearchOptions` is built once at startup and shared read-only by every
//! worker. Every check here is a configuration error: fatal, never retried.

use log::debug;

use super::args::SearchArgs;
use crate::align::{AlignerParams, AlignmentMode};
use crate::error::{Result, SaltError};
use crate::extension::FilterParams;
use crate::post::SelectorLimits;
use crate::seed::SeedShape;
use crate::sequence::{FrameScheme, Reduction, SequenceType};
use crate::utils::matrix::ScoringMatrix;

pub const DEFAULT_BAND: usize = 4;
pub const DEFAULT_X_DROP: i32 = 20;
pub const DEFAULT_MIN_BIT_SCORE: f64 = 50.0;
pub const DEFAULT_MAX_EXPECTED: f64 = 1.0;
pub const DEFAULT_MAX_ALIGNMENTS_PER_QUERY: usize = 25;
pub const DEFAULT_MAX_ALIGNMENTS_PER_REFERENCE: usize = 1;
pub const DEFAULT_MAX_OCCURRENCES: usize = 1000;
pub const DEFAULT_CHUNKS: usize = 1;
pub const DEFAULT_JOBS: usize = 16;

pub const DNA_SHAPE: &str = "111110111011110110111111";
pub const PROTEIN_SHAPE: &str = "111101101110111";

/// What is searched against what
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// DNA queries (both strands) against DNA references
    BlastN,
    /// DNA queries translated in six frames against protein references
    BlastX,
    /// Protein queries against protein references
    BlastP,
}

impl SearchMode {
    pub fn name(&self) -> &'static str {
        match self {
            SearchMode::BlastN => "BlastN",
            SearchMode::BlastX => "BlastX",
            SearchMode::BlastP => "BlastP",
        }
    }

    pub fn frame_scheme(&self) -> FrameScheme {
        match self {
            SearchMode::BlastN => FrameScheme::Strands,
            SearchMode::BlastX => FrameScheme::SixFrames,
            SearchMode::BlastP => FrameScheme::Identity,
        }
    }

    pub fn reference_type(&self) -> SequenceType {
        match self {
            SearchMode::BlastN => SequenceType::Dna,
            SearchMode::BlastX | SearchMode::BlastP => SequenceType::Protein,
        }
    }

    /// Fails when the reference set holds the wrong kind of sequences
    pub fn check_reference_type(&self, found: SequenceType) -> Result<()> {
        if found != self.reference_type() {
            return Err(SaltError::IncompatibleSequenceType {
                mode: self.name().to_string(),
                expected: self.reference_type().to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    fn default_gap_costs(&self) -> (i32, i32) {
        match self {
            SearchMode::BlastN => (7, 2),
            SearchMode::BlastX | SearchMode::BlastP => (12, 1),
        }
    }

    fn default_min_ungapped_score(&self) -> i32 {
        match self {
            SearchMode::BlastN => 20,
            SearchMode::BlastX | SearchMode::BlastP => 25,
        }
    }

    fn default_shape(&self) -> &'static str {
        match self {
            SearchMode::BlastN => DNA_SHAPE,
            SearchMode::BlastX | SearchMode::BlastP => PROTEIN_SHAPE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub mode: SearchMode,
    pub matrix: ScoringMatrix,
    pub reduction: Reduction,
    pub shapes: Vec<SeedShape>,
    pub aligner: AlignerParams,
    pub filter: FilterParams,
    pub selector: SelectorLimits,
    pub min_bit_score: f64,
    pub max_expected: f64,
    pub max_occurrences: usize,
    pub mask_threshold: Option<usize>,
    pub chunks: usize,
    pub jobs: usize,
    pub threads: usize,
    pub verbose: bool,
}

fn require_power_of_two(parameter: &str, value: usize) -> Result<()> {
    if value == 0 || !value.is_power_of_two() {
        return Err(SaltError::invalid_parameter(
            parameter,
            format!("must be a power of two, got {}", value),
        ));
    }
    Ok(())
}

fn require_at_least(parameter: &str, value: usize, min: usize) -> Result<()> {
    if value < min {
        return Err(SaltError::invalid_parameter(
            parameter,
            format!("must be at least {}, got {}", min, value),
        ));
    }
    Ok(())
}

impl SearchOptions {
    /// Every option at the default of `mode`
    pub fn defaults(mode: SearchMode) -> Result<Self> {
        Self::from_args(mode, &SearchArgs::new("", ""))
    }

    pub fn from_args(mode: SearchMode, args: &SearchArgs) -> Result<Self> {
        let matrix = match mode {
            SearchMode::BlastN => {
                let (reward, penalty) = (args.reward.unwrap_or(2), args.penalty.unwrap_or(-3));
                if reward <= 0 || penalty >= 0 {
                    return Err(SaltError::invalid_parameter(
                        "reward/penalty",
                        format!("need a positive reward and a negative penalty, got {}/{}", reward, penalty),
                    ));
                }
                ScoringMatrix::nucleotide(reward, penalty)
            }
            SearchMode::BlastX | SearchMode::BlastP => ScoringMatrix::by_name(&args.matrix)?,
        };

        let reduction = match (mode, &args.reduction) {
            (SearchMode::BlastN, Some(name)) => Reduction::by_name(name, SequenceType::Dna)?,
            (SearchMode::BlastN, None) => Reduction::dna(),
            (_, Some(name)) => Reduction::by_name(name, SequenceType::Protein)?,
            (_, None) => Reduction::by_name("DIAMOND_11", SequenceType::Protein)?,
        };

        let patterns: Vec<&str> = if args.shapes.is_empty() {
            vec![mode.default_shape()]
        } else {
            args.shapes.iter().map(String::as_str).collect()
        };
        let shapes = patterns
            .iter()
            .enumerate()
            .map(|(id, pattern)| SeedShape::parse(id, pattern, &reduction))
            .collect::<Result<Vec<_>>>()?;

        let (default_open, default_extend) = mode.default_gap_costs();
        let gap_open = args.gap_open.unwrap_or(default_open);
        let gap_extend = args.gap_extend.unwrap_or(default_extend);
        if gap_extend < 0 || gap_open < gap_extend {
            return Err(SaltError::invalid_parameter(
                "gap costs",
                format!(
                    "need gap_open >= gap_extend >= 0, got {}/{}",
                    gap_open, gap_extend
                ),
            ));
        }
        require_at_least("band", args.band, 1)?;

        if args.semi_global && mode != SearchMode::BlastN {
            return Err(SaltError::invalid_parameter(
                "semi_global",
                format!("only available for BlastN, not {}", mode.name()),
            ));
        }
        let alignment_mode = if args.semi_global {
            AlignmentMode::SemiGlobal
        } else {
            AlignmentMode::Local
        };

        if args.x_drop < 0 {
            return Err(SaltError::invalid_parameter("x_drop", "must not be negative"));
        }
        require_at_least("max_alignments_per_query", args.max_alignments_per_query, 1)?;
        require_at_least("max_alignments_per_reference", args.max_alignments_per_reference, 1)?;
        require_at_least("max_seed_occurrences", args.max_seed_occurrences, 1)?;
        if let Some(threshold) = args.mask_threshold {
            require_at_least("mask_threshold", threshold, 1)?;
        }
        if !(0.0..=100.0).contains(&args.min_percent_identity) {
            return Err(SaltError::invalid_parameter(
                "min_percent_identity",
                format!("must be within 0..=100, got {}", args.min_percent_identity),
            ));
        }
        if args.evalue <= 0.0 {
            return Err(SaltError::invalid_parameter("evalue", "must be positive"));
        }
        require_power_of_two("chunks", args.chunks)?;
        require_power_of_two("jobs", args.jobs)?;

        let threads = if args.num_threads == 0 {
            num_cpus::get()
        } else {
            args.num_threads
        };

        let options = Self {
            mode,
            matrix,
            reduction,
            shapes,
            aligner: AlignerParams {
                band: args.band,
                gap_open,
                gap_extend,
                mode: alignment_mode,
            },
            filter: FilterParams {
                min_seed_identities: args.min_seed_identities,
                x_drop: args.x_drop,
                min_ungapped_score: args
                    .min_ungapped_score
                    .unwrap_or(mode.default_min_ungapped_score()),
            },
            selector: SelectorLimits {
                max_per_query: args.max_alignments_per_query,
                max_per_reference: args.max_alignments_per_reference,
                min_percent_identity: args.min_percent_identity,
            },
            min_bit_score: args.min_bit_score,
            max_expected: args.evalue,
            max_occurrences: args.max_seed_occurrences,
            mask_threshold: args.mask_threshold,
            chunks: args.chunks,
            jobs: args.jobs,
            threads,
            verbose: args.verbose,
        };
        debug!("{:?}", options);
        Ok(options)
    }

    /// Longest configured seed window
    pub fn max_shape_length(&self) -> usize {
        self.shapes.iter().map(SeedShape::length).max().unwrap_or(0)
    }
}
