//! Console text output.

use crate::models::FilteredPaperRecord;

/// Format accepted papers for the terminal.
#[must_use]
pub fn format_papers_text(records: &[FilteredPaperRecord]) -> String {
    if records.is_empty() {
        return "No papers found matching the criteria.\n".to_string();
    }

    records.iter().map(format_paper_text).collect::<Vec<_>>().join("\n")
}

/// Format a single accepted paper.
#[must_use]
pub fn format_paper_text(record: &FilteredPaperRecord) -> String {
    let paper = &record.paper;
    let mut output = String::new();

    output.push_str(&format!("PMID: {}\n", paper.pmid));
    output.push_str(&format!("Title: {}\n", paper.title_or_default()));
    if !paper.publication_date.is_empty() {
        output.push_str(&format!("Publication Date: {}\n", paper.publication_date));
    }
    output.push_str(&format!(
        "Companies ({}): {}\n",
        record.company_count,
        record.companies.join("; ")
    ));
    if let Some(email) = paper.corresponding_email() {
        output.push_str(&format!("Corresponding Email: {email}\n"));
    }

    output.push_str("Authors:\n");
    for author in &paper.authors {
        let marker = if record.commercial_authors.contains(&author.name) { " *" } else { "" };
        output.push_str(&format!("  - {}{marker}\n", author.name));
        for affiliation in &author.affiliations {
            output.push_str(&format!("    Affiliation: {affiliation}\n"));
        }
    }

    output
}
