use clap::Args;
use std::path::PathBuf;

use super::options::{
    DEFAULT_BAND, DEFAULT_CHUNKS, DEFAULT_JOBS, DEFAULT_MAX_ALIGNMENTS_PER_QUERY,
    DEFAULT_MAX_ALIGNMENTS_PER_REFERENCE, DEFAULT_MAX_EXPECTED, DEFAULT_MAX_OCCURRENCES,
    DEFAULT_MIN_BIT_SCORE, DEFAULT_X_DROP,
};

/// Command-line options shared by every search mode. Options left unset
/// take the defaults of the chosen mode.
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Query sequences (FASTA)
    #[arg(short, long)]
    pub query: PathBuf,
    /// Reference sequences (FASTA)
    #[arg(short = 'd', long)]
    pub reference: PathBuf,
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    /// Output format: 6 = tabular, 0 = pairwise
    #[arg(long, default_value = "6")]
    pub outfmt: String,

    // Scoring; defaults depend on the mode
    #[arg(long)]
    pub reward: Option<i32>,
    #[arg(long, allow_hyphen_values = true)]
    pub penalty: Option<i32>,
    #[arg(long, default_value = "BLOSUM62")]
    pub matrix: String,
    #[arg(long)]
    pub gap_open: Option<i32>,
    #[arg(long)]
    pub gap_extend: Option<i32>,

    /// Seed shape, e.g. 111010010100110111; may be given several times
    #[arg(long = "shape")]
    pub shapes: Vec<String>,
    /// Protein alphabet reduction used for seeds
    /// (UNREDUCED, DIAMOND_11, MURPHY_10, BLOSUM50_8)
    #[arg(long)]
    pub reduction: Option<String>,

    /// Band half-width of the gapped alignment
    #[arg(long, default_value_t = DEFAULT_BAND)]
    pub band: usize,
    #[arg(long, default_value_t = DEFAULT_X_DROP)]
    pub x_drop: i32,
    /// Minimum raw score of the ungapped extension
    #[arg(long)]
    pub min_ungapped_score: Option<i32>,
    /// Minimum identical residues within a seed window
    #[arg(long, default_value_t = 0)]
    pub min_seed_identities: usize,
    /// Use semi-global (end-to-end on one sequence) alignment; BlastN only
    #[arg(long, default_value_t = false)]
    pub semi_global: bool,

    #[arg(long, default_value_t = DEFAULT_MIN_BIT_SCORE)]
    pub min_bit_score: f64,
    #[arg(short, long, default_value_t = DEFAULT_MAX_EXPECTED)]
    pub evalue: f64,
    #[arg(long, default_value_t = 0.0)]
    pub min_percent_identity: f64,
    #[arg(long, default_value_t = DEFAULT_MAX_ALIGNMENTS_PER_QUERY)]
    pub max_alignments_per_query: usize,
    #[arg(long, default_value_t = DEFAULT_MAX_ALIGNMENTS_PER_REFERENCE)]
    pub max_alignments_per_reference: usize,

    /// Reference occurrences of one seed code used per query seed
    #[arg(long, default_value_t = DEFAULT_MAX_OCCURRENCES)]
    pub max_seed_occurrences: usize,
    /// Mask reference seeds occurring more often than this
    #[arg(long)]
    pub mask_threshold: Option<usize>,

    /// Number of seed-space chunks (power of two)
    #[arg(long, default_value_t = DEFAULT_CHUNKS)]
    pub chunks: usize,
    /// Number of jobs per chunk (power of two)
    #[arg(long, default_value_t = DEFAULT_JOBS)]
    pub jobs: usize,
    /// Worker threads (0 = number of CPUs)
    #[arg(short = 'n', long, default_value_t = 0)]
    pub num_threads: usize,
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

impl SearchArgs {
    /// Arguments with every option at its default
    pub fn new(query: impl Into<PathBuf>, reference: impl Into<PathBuf>) -> Self {
        Self {
            query: query.into(),
            reference: reference.into(),
            out: None,
            outfmt: "6".to_string(),
            reward: None,
            penalty: None,
            matrix: "BLOSUM62".to_string(),
            gap_open: None,
            gap_extend: None,
            shapes: Vec::new(),
            reduction: None,
            band: DEFAULT_BAND,
            x_drop: DEFAULT_X_DROP,
            min_ungapped_score: None,
            min_seed_identities: 0,
            semi_global: false,
            min_bit_score: DEFAULT_MIN_BIT_SCORE,
            evalue: DEFAULT_MAX_EXPECTED,
            min_percent_identity: 0.0,
            max_alignments_per_query: DEFAULT_MAX_ALIGNMENTS_PER_QUERY,
            max_alignments_per_reference: DEFAULT_MAX_ALIGNMENTS_PER_REFERENCE,
            max_seed_occurrences: DEFAULT_MAX_OCCURRENCES,
            mask_threshold: None,
            chunks: DEFAULT_CHUNKS,
            jobs: DEFAULT_JOBS,
            num_threads: 0,
            verbose: false,
        }
    }
}
