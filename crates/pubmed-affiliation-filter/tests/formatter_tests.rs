//! Formatter tests for CSV, JSON and console output.
//!
//! Tests output correctness, quoting and special character handling.

use pubmed_affiliation_filter::formatters::{
    self, CSV_HEADERS, format_papers_text, paper_json, write_csv, write_csv_file,
};
use pubmed_affiliation_filter::models::{Author, FilteredPaperRecord, PaperRecord};

// =============================================================================
// Helper Functions
// =============================================================================

fn make_record() -> FilteredPaperRecord {
    let mut lead = Author::new("Maria Rossi", "Novartis Pharma AG, Basel, Switzerland");
    lead.email = Some("maria.rossi@novartis.com".to_string());

    FilteredPaperRecord {
        paper: PaperRecord {
            pmid: "38123456".to_string(),
            title: "Bispecific antibodies, \"a review\"".to_string(),
            publication_date: "2024-01-15".to_string(),
            authors: vec![
                lead,
                Author::new("Tom Baker", "Harvard University"),
                Author::new("Li Wei", "Novartis Pharma AG, Basel, Switzerland"),
            ],
        },
        company_count: 1,
        companies: vec!["Novartis Pharma AG".to_string()],
        commercial_authors: vec!["Maria Rossi".to_string(), "Li Wei".to_string()],
    }
}

fn read_rows(data: &[u8]) -> Vec<csv::StringRecord> {
    csv::Reader::from_reader(data).records().map(Result::unwrap).collect()
}

// =============================================================================
// CSV
// =============================================================================

#[test]
fn test_csv_header_row() {
    let mut buffer = Vec::new();
    write_csv(&[], &mut buffer).unwrap();

    let mut reader = csv::Reader::from_reader(buffer.as_slice());
    let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(headers, CSV_HEADERS);
    assert_eq!(reader.records().count(), 0);
}

#[test]
fn test_csv_row_contents() {
    let mut buffer = Vec::new();
    write_csv(&[make_record()], &mut buffer).unwrap();

    let rows = read_rows(&buffer);
    assert_eq!(rows.len(), 1);
    let row = &rows[0];

    assert_eq!(&row[0], "38123456");
    assert_eq!(&row[1], "Bispecific antibodies, \"a review\"");
    assert_eq!(&row[2], "2024-01-15");
    assert_eq!(&row[3], "Maria Rossi; Tom Baker; Li Wei");
    assert_eq!(&row[4], "Maria Rossi; Li Wei");
    assert_eq!(&row[5], "Novartis Pharma AG, Basel, Switzerland; Harvard University");
    assert_eq!(&row[6], "Novartis Pharma AG");
    assert_eq!(&row[7], "maria.rossi@novartis.com");
}

#[test]
fn test_csv_guards_formula_like_titles() {
    let mut record = make_record();
    record.paper.title = "=HYPERLINK(\"http://evil\")".to_string();

    let mut buffer = Vec::new();
    write_csv(&[record], &mut buffer).unwrap();

    assert!(read_rows(&buffer)[0][1].starts_with("'="));
}

#[test]
fn test_csv_file_is_written_and_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");
    std::fs::write(&path, "stale contents that must disappear\n").unwrap();

    write_csv_file(&[make_record(), make_record()], &path).unwrap();

    let contents = std::fs::read(&path).unwrap();
    assert_eq!(read_rows(&contents).len(), 2);
    assert!(!String::from_utf8(contents).unwrap().contains("stale"));
}

#[test]
fn test_csv_file_in_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("results.csv");
    assert!(write_csv_file(&[make_record()], &path).is_err());
}

// =============================================================================
// JSON
// =============================================================================

#[test]
fn test_json_record_fields() {
    let value = paper_json(&make_record());

    assert_eq!(value["pmid"], "38123456");
    assert_eq!(value["publicationDate"], "2024-01-15");
    assert_eq!(value["authors"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["nonAcademicAuthors"][1], "Li Wei");
    assert_eq!(value["affiliations"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["companyCount"], 1);
}

#[test]
fn test_json_omits_missing_email() {
    let mut record = make_record();
    record.paper.authors[0].email = None;
    assert!(paper_json(&record).get("correspondingEmail").is_none());
}

#[test]
fn test_json_array_is_valid_json_text() {
    let text = serde_json::to_string(&formatters::papers_json(&[make_record()])).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed[0]["companies"][0], "Novartis Pharma AG");
}

// =============================================================================
// Console Text
// =============================================================================

#[test]
fn test_text_lists_every_paper() {
    let mut second = make_record();
    second.paper.pmid = "38999999".to_string();

    let text = format_papers_text(&[make_record(), second]);

    assert!(text.contains("PMID: 38123456"));
    assert!(text.contains("PMID: 38999999"));
    assert!(text.contains("Publication Date: 2024-01-15"));
    assert!(text.contains("Companies (1): Novartis Pharma AG"));
    assert!(text.contains("Corresponding Email: maria.rossi@novartis.com"));
    assert!(text.contains("  - Li Wei *"));
}

#[test]
fn test_text_untitled_paper() {
    let mut record = make_record();
    record.paper.title.clear();
    assert!(format_papers_text(&[record]).contains("Title: Untitled"));
}
