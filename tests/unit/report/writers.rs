//! Tabular and pairwise output of real searches

use bio::alphabets::dna::revcomp;
use SALT::config::{SearchMode, SearchOptions};
use SALT::engine::{search, QueryResult};
use SALT::report::{write_results, writer_for, OutputFormat, PairwiseWriter, ReportContext};
use SALT::store::{InMemoryQueryStore, InMemoryReferenceStore};

use super::super::helpers::{back_translate, random_dna, random_protein, records, test_options};

struct Fixture {
    options: SearchOptions,
    queries: InMemoryQueryStore,
    references: InMemoryReferenceStore,
    results: Vec<QueryResult>,
}

impl Fixture {
    fn new(mode: SearchMode, queries: &[(&str, &[u8])], references: &[(&str, &[u8])]) -> Self {
        let options = test_options(mode);
        let queries = InMemoryQueryStore::new(records(queries), mode.frame_scheme()).unwrap();
        let references = InMemoryReferenceStore::new(records(references), mode.reference_type()).unwrap();
        let results = search(&options, &queries, &references).unwrap();
        Self {
            options,
            queries,
            references,
            results,
        }
    }

    fn render(&self, format: OutputFormat) -> String {
        let mut buffer = Vec::new();
        {
            let mut writer = writer_for(format, &mut buffer);
            write_results(writer.as_mut(), &self.context(), &self.results).unwrap();
        }
        String::from_utf8(buffer).unwrap()
    }

    fn context(&self) -> ReportContext<'_> {
        ReportContext {
            queries: &self.queries,
            references: &self.references,
            matrix: &self.options.matrix,
        }
    }
}

fn dna_fixture() -> Fixture {
    let chr1 = random_dna(400, 11);
    let chr2 = random_dna(300, 12);
    let read1 = chr1[100..220].to_vec();
    let read2 = revcomp(&chr2[50..150]);
    Fixture::new(
        SearchMode::BlastN,
        &[("read1", &read1[..]), ("read2", &read2[..])],
        &[("chr1", &chr1[..]), ("chr2", &chr2[..])],
    )
}

#[test]
fn test_tabular_columns() {
    let fixture = dna_fixture();
    let text = fixture.render(OutputFormat::Tabular);
    let lines: Vec<Vec<&str>> = text.lines().map(|l| l.split('\t').collect()).collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|fields| fields.len() == 12));

    assert_eq!(
        &lines[0][..10],
        &["read1", "chr1", "100.000", "120", "0", "0", "1", "120", "101", "220"]
    );
    // reverse strand: query start after query end
    assert_eq!(
        &lines[1][..10],
        &["read2", "chr2", "100.000", "100", "0", "0", "100", "1", "51", "150"]
    );
    let bits: f64 = lines[0][11].parse().unwrap();
    assert!(bits > 100.0);
}

#[test]
fn test_pairwise_nucleotide_blocks() {
    let fixture = dna_fixture();
    let text = fixture.render(OutputFormat::Pairwise);

    assert!(text.contains("Query= read1\nLength=120\n"));
    assert!(text.contains(">chr1\nLength=400\n"));
    assert!(text.contains(" Identities = 120/120 (100%), Gaps = 0/120 (0%)"));
    assert!(text.contains(" Strand = Plus/Plus"));
    assert!(text.contains(" Strand = Plus/Minus"));

    let query_rows: Vec<&str> = text.lines().filter(|l| l.starts_with("Query ")).collect();
    assert_eq!(query_rows.len(), 4);
    assert!(query_rows[0].starts_with("Query  1    ") && query_rows[0].ends_with("  60"));
    assert!(query_rows[1].starts_with("Query  61   ") && query_rows[1].ends_with("  120"));
    assert!(query_rows[2].starts_with("Query  100  ") && query_rows[2].ends_with("  41"));
    assert!(query_rows[3].starts_with("Query  40   ") && query_rows[3].ends_with("  1"));

    let subject_rows: Vec<&str> = text.lines().filter(|l| l.starts_with("Sbjct ")).collect();
    assert!(subject_rows[0].starts_with("Sbjct  101  ") && subject_rows[0].ends_with("  160"));
    assert!(subject_rows[3].ends_with("  150"));

    let midline = "|".repeat(60);
    assert!(text.lines().any(|l| l.trim_start() == midline));
}

#[test]
fn test_pairwise_protein_positives() {
    let reference = random_protein(120, 21);
    let mut query = reference[20..100].to_vec();
    // a conservative substitution and a mismatch
    query[10] = if query[10] == b'I' { b'V' } else { b'I' };
    query[40] = if query[40] == b'W' { b'G' } else { b'W' };
    let fixture = Fixture::new(SearchMode::BlastP, &[("q", &query[..])], &[("p", &reference[..])]);
    let text = fixture.render(OutputFormat::Pairwise);

    assert!(text.contains("Positives = "));
    assert!(!text.contains("Strand ="));
    assert!(!text.contains("Frame ="));

    let m = &fixture.results[0].matches[0];
    let stats = &m.alignment.stats;
    assert_eq!(stats.identities + stats.mismatches, stats.length);
    assert!(text.contains(&format!(" Identities = {}/{}", stats.identities, stats.length)));
}

#[test]
fn test_pairwise_translated_frame() {
    let reference = random_protein(100, 31);
    let query = back_translate(&reference);
    let fixture = Fixture::new(SearchMode::BlastX, &[("orf", &query[..])], &[("p", &reference[..])]);
    let text = fixture.render(OutputFormat::Pairwise);
    assert!(text.contains(" Frame = +1"));

    let query_rows: Vec<&str> = text.lines().filter(|l| l.starts_with("Query ")).collect();
    assert_eq!(query_rows.len(), 2);
    // 60 amino acids cover 180 bases
    assert!(query_rows[0].starts_with("Query  1  ") && query_rows[0].ends_with("  180"));
    assert!(query_rows[1].ends_with("  300"));
}

#[test]
fn test_custom_line_length() {
    let fixture = dna_fixture();
    let mut buffer = Vec::new();
    {
        let mut writer = PairwiseWriter::with_line_length(&mut buffer, 50);
        write_results(&mut writer, &fixture.context(), &fixture.results[..1]).unwrap();
    }
    let text = String::from_utf8(buffer).unwrap();
    assert_eq!(text.lines().filter(|l| l.starts_with("Query ")).count(), 3);
}

#[test]
fn test_no_results_writes_nothing() {
    let fixture = dna_fixture();
    let mut buffer = Vec::new();
    {
        let mut writer = writer_for(OutputFormat::Tabular, &mut buffer);
        write_results(writer.as_mut(), &fixture.context(), &[]).unwrap();
    }
    assert!(buffer.is_empty());
}
