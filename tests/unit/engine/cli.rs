//! `run` from FASTA files to an output file

use std::fs;

use SALT::config::{SearchArgs, SearchMode};
use SALT::engine::run;

use super::super::helpers::random_dna;

fn fasta(records: &[(&str, &[u8])]) -> String {
    records
        .iter()
        .map(|(name, seq)| format!(">{}\n{}\n", name, String::from_utf8_lossy(seq)))
        .collect()
}

#[test]
fn test_run_writes_tabular_file() {
    let dir = tempfile::tempdir().unwrap();
    let chr = random_dna(500, 7);
    let read = chr[150..300].to_vec();
    let query_path = dir.path().join("reads.fa");
    let reference_path = dir.path().join("ref.fa");
    let out_path = dir.path().join("hits.tsv");
    fs::write(&query_path, fasta(&[("read", &read[..])])).unwrap();
    fs::write(&reference_path, fasta(&[("chr", &chr[..])])).unwrap();

    let mut args = SearchArgs::new(&query_path, &reference_path);
    args.out = Some(out_path.clone());
    args.num_threads = 2;
    args.verbose = true;
    run(SearchMode::BlastN, args).unwrap();

    let output = fs::read_to_string(&out_path).unwrap();
    let fields: Vec<&str> = output.trim_end().split('\t').collect();
    assert_eq!(&fields[..2], &["read", "chr"]);
    assert_eq!(&fields[6..10], &["1", "150", "151", "300"]);
}

#[test]
fn test_run_reports_bad_options() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("x.fa");
    fs::write(&path, ">x\nACGT\n").unwrap();
    let mut args = SearchArgs::new(&path, &path);
    args.jobs = 3;
    let err = run(SearchMode::BlastN, args).unwrap_err();
    assert!(format!("{:#}", err).contains("power of two"));

    let mut args = SearchArgs::new(&path, &path);
    args.outfmt = "5".to_string();
    assert!(run(SearchMode::BlastN, args).is_err());
}

#[test]
fn test_run_missing_input_names_the_file() {
    let args = SearchArgs::new("/nonexistent/reads.fa", "/nonexistent/ref.fa");
    let err = run(SearchMode::BlastN, args).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/reads.fa"));
}
