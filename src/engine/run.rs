//! Command-line entry point shared by every search mode

use std::fs::File;
use std::io::{self, Write};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use super::search::SearchEngine;
use crate::config::{SearchArgs, SearchMode, SearchOptions};
use crate::report::{write_results, writer_for, OutputFormat, ReportContext};
use crate::store::{InMemoryQueryStore, InMemoryReferenceStore, QueryStore, ReferenceStore};

pub fn run(mode: SearchMode, args: SearchArgs) -> Result<()> {
    let options = SearchOptions::from_args(mode, &args).context("Invalid search options")?;
    let format = OutputFormat::parse(&args.outfmt)?;

    let queries = InMemoryQueryStore::from_fasta(&args.query, mode.frame_scheme())
        .with_context(|| format!("Failed to read queries from {}", args.query.display()))?;
    let references = InMemoryReferenceStore::from_fasta(&args.reference)
        .with_context(|| format!("Failed to read references from {}", args.reference.display()))?;
    info!(
        "Loaded {} queries and {} references ({} residues)",
        queries.sequence_count(),
        references.sequence_count(),
        references.total_length()
    );
    if queries.sequence_count() == 0 || references.sequence_count() == 0 {
        warn!("Nothing to search: empty query or reference set");
        return Ok(());
    }

    let bar = if args.verbose {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} passes")
                .context("Invalid progress bar template")?,
        );
        bar
    };

    let outcome = SearchEngine::new(&options, &queries, &references)?
        .with_progress(bar)
        .run()
        .context("Search failed")?;

    let out: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let ctx = ReportContext {
        queries: &queries,
        references: &references,
        matrix: &options.matrix,
    };
    let mut writer = writer_for(format, out);
    write_results(writer.as_mut(), &ctx, &outcome.results).context("Failed to write results")?;
    Ok(())
}
