//! CSV output.

use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::error::AppResult;
use crate::models::FilteredPaperRecord;

/// Column headers, in output order.
pub const CSV_HEADERS: [&str; 8] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Authors",
    "Non-academic Author(s)",
    "Affiliations",
    "Company Name(s)",
    "Corresponding Author Email",
];

/// Separator for multi-valued cells.
const LIST_SEPARATOR: &str = "; ";

fn row(record: &FilteredPaperRecord) -> [String; 8] {
    let paper = &record.paper;
    [
        paper.pmid.clone(),
        guard_formula(&paper.title),
        paper.publication_date.clone(),
        guard_formula(&paper.author_names()),
        guard_formula(&record.commercial_authors.join(LIST_SEPARATOR)),
        guard_formula(&paper.affiliations().join(LIST_SEPARATOR)),
        guard_formula(&record.companies.join(LIST_SEPARATOR)),
        paper.corresponding_email().unwrap_or_default().to_string(),
    ]
}

/// Prefix cells a spreadsheet would evaluate as a formula.
fn guard_formula(s: &str) -> String {
    if s.starts_with(['=', '+', '-', '@']) { format!("'{s}") } else { s.to_string() }
}

/// Write records as CSV, header included.
pub fn write_csv<W: Write>(records: &[FilteredPaperRecord], writer: W) -> AppResult<()> {
    let mut csv = ::csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADERS)?;
    for record in records {
        csv.write_record(row(record))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write records to a CSV file, replacing it if it exists.
pub fn write_csv_file(records: &[FilteredPaperRecord], path: &Path) -> AppResult<()> {
    let file = std::fs::File::create(path)?;
    write_csv(records, std::io::BufWriter::new(file))?;
    info!(path = %path.display(), count = records.len(), "Saved papers to CSV");
    Ok(())
}
