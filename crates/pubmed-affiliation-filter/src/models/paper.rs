//! Paper data model built from PubMed efetch records.

use serde::{Deserialize, Serialize};

/// One author of a paper, with every affiliation PubMed lists for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// Display name ("ForeName LastName" or a collective name).
    pub name: String,

    /// Affiliation strings in the order PubMed supplies them.
    #[serde(default)]
    pub affiliations: Vec<String>,

    /// First e-mail address found in the affiliations.
    #[serde(default)]
    pub email: Option<String>,
}

impl Author {
    /// Create an author with a single affiliation.
    #[must_use]
    pub fn new(name: impl Into<String>, affiliation: impl Into<String>) -> Self {
        let affiliation = affiliation.into();
        Self {
            name: name.into(),
            affiliations: if affiliation.is_empty() { vec![] } else { vec![affiliation] },
            email: None,
        }
    }

    /// Affiliations joined for single-cell output.
    #[must_use]
    pub fn affiliation_text(&self) -> String {
        self.affiliations.join("; ")
    }
}

/// A paper as fetched from PubMed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperRecord {
    /// PubMed ID.
    pub pmid: String,

    /// Article title.
    #[serde(default)]
    pub title: String,

    /// Publication date, `YYYY-MM-DD` when PubMed supplies a full date.
    #[serde(default)]
    pub publication_date: String,

    /// Authors in byline order.
    #[serde(default)]
    pub authors: Vec<Author>,
}

impl PaperRecord {
    /// Get the title, falling back to "Untitled" if PubMed had none.
    #[must_use]
    pub fn title_or_default(&self) -> &str {
        if self.title.is_empty() { "Untitled" } else { &self.title }
    }

    /// Get author names as a `; `-separated string.
    #[must_use]
    pub fn author_names(&self) -> String {
        self.authors
            .iter()
            .map(|a| a.name.as_str())
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Distinct affiliation strings in order of first appearance.
    #[must_use]
    pub fn affiliations(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for affiliation in self.authors.iter().flat_map(|a| &a.affiliations) {
            if !seen.contains(&affiliation.as_str()) {
                seen.push(affiliation.as_str());
            }
        }
        seen
    }

    /// E-mail of the first author that has one.
    #[must_use]
    pub fn corresponding_email(&self) -> Option<&str> {
        self.authors.iter().find_map(|a| a.email.as_deref())
    }
}

/// A paper that met the company threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredPaperRecord {
    /// The underlying paper.
    #[serde(flatten)]
    pub paper: PaperRecord,

    /// Number of distinct companies among the author affiliations.
    pub company_count: usize,

    /// Distinct company names, first spelling seen.
    pub companies: Vec<String>,

    /// Authors with at least one commercial affiliation.
    pub commercial_authors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affiliations_are_distinct_and_ordered() {
        let paper = PaperRecord {
            pmid: "1".to_string(),
            authors: vec![
                Author::new("A", "Pfizer Inc."),
                Author::new("B", "Harvard University"),
                Author::new("C", "Pfizer Inc."),
            ],
            ..Default::default()
        };
        assert_eq!(paper.affiliations(), vec!["Pfizer Inc.", "Harvard University"]);
    }

    #[test]
    fn test_corresponding_email_takes_first_available() {
        let mut second = Author::new("B", "Genentech Inc.");
        second.email = Some("b@gene.com".to_string());
        let paper = PaperRecord {
            pmid: "1".to_string(),
            authors: vec![Author::new("A", ""), second],
            ..Default::default()
        };
        assert_eq!(paper.corresponding_email(), Some("b@gene.com"));
    }

    #[test]
    fn test_title_fallback() {
        assert_eq!(PaperRecord::default().title_or_default(), "Untitled");
    }
}
