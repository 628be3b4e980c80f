//! JSON output formatting.

use serde_json::{Value, json};

use crate::models::FilteredPaperRecord;

/// Flat JSON representation of one accepted paper.
#[must_use]
pub fn paper_json(record: &FilteredPaperRecord) -> Value {
    let paper = &record.paper;

    let mut obj = json!({
        "pmid": paper.pmid,
        "title": paper.title_or_default(),
        "publicationDate": paper.publication_date,
        "authors": paper.authors.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
        "nonAcademicAuthors": record.commercial_authors,
        "affiliations": paper.affiliations(),
        "companies": record.companies,
        "companyCount": record.company_count,
    });

    if let Some(email) = paper.corresponding_email() {
        obj["correspondingEmail"] = json!(email);
    }

    obj
}

/// JSON array of accepted papers.
#[must_use]
pub fn papers_json(records: &[FilteredPaperRecord]) -> Value {
    Value::Array(records.iter().map(paper_json).collect())
}
