use anyhow::Result;
use clap::{Parser, Subcommand};
use SALT::config::{SearchArgs, SearchMode};
use SALT::engine;

#[derive(Parser)]
#[command(name = "salt")]
#[command(version = "0.1.0")]
#[command(about = "Seed-and-extend alignment of queries against a reference set", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Nucleotide vs Nucleotide (both strands)
    Blastn(SearchArgs),

    /// Translated DNA vs Protein (six frames)
    Blastx(SearchArgs),

    /// Protein vs Protein
    Blastp(SearchArgs),
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mode, args) = match cli.command {
        Commands::Blastn(args) => (SearchMode::BlastN, args),
        Commands::Blastx(args) => (SearchMode::BlastX, args),
        Commands::Blastp(args) => (SearchMode::BlastP, args),
    };
    init_logging(args.verbose);
    engine::run(mode, args)
}
