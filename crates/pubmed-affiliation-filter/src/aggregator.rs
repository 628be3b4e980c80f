//! Per-paper aggregation of author affiliations.
//!
//! A paper is kept when its authors' affiliations name at least
//! `min_companies` distinct companies. Company names are compared with
//! [`company_key`], so `"Pfizer Inc."` and `"PFIZER, INC"` count once.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::classifier::{AffiliationClassifier, company_key};
use crate::error::RecordError;
use crate::models::{FilteredPaperRecord, PaperRecord};

/// Evaluate one paper against the company threshold.
///
/// `min_companies` of 0 is treated as 1, so a paper without any commercial
/// affiliation is never kept.
pub fn evaluate(
    classifier: &AffiliationClassifier,
    paper: &PaperRecord,
    min_companies: usize,
) -> Result<Option<FilteredPaperRecord>, RecordError> {
    if paper.pmid.trim().is_empty() {
        return Err(RecordError::malformed(format!(
            "missing PubMed ID (title: {:?})",
            paper.title_or_default()
        )));
    }

    let mut seen = HashSet::new();
    let mut companies = Vec::new();
    let mut commercial_authors = Vec::new();

    for author in &paper.authors {
        let mut is_commercial = false;
        for affiliation in &author.affiliations {
            let classification = classifier.classify(affiliation);
            if let Some(company) = classification.company() {
                is_commercial = true;
                if seen.insert(company_key(company)) {
                    companies.push(company.to_string());
                }
            }
        }
        if is_commercial && !author.name.is_empty() {
            commercial_authors.push(author.name.clone());
        }
    }

    let threshold = min_companies.max(1);
    if companies.len() < threshold {
        debug!(pmid = %paper.pmid, companies = companies.len(), threshold, "Paper excluded");
        return Ok(None);
    }

    Ok(Some(FilteredPaperRecord {
        paper: paper.clone(),
        company_count: companies.len(),
        companies,
        commercial_authors,
    }))
}

/// Result of filtering a batch of papers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Papers that met the threshold, in input order.
    pub accepted: Vec<FilteredPaperRecord>,
    /// Papers below the threshold.
    pub rejected: usize,
    /// Papers skipped as malformed.
    pub malformed: usize,
}

/// Evaluate a batch; malformed records are logged and skipped.
#[must_use]
pub fn filter_papers(
    classifier: &AffiliationClassifier,
    papers: &[PaperRecord],
    min_companies: usize,
) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    for paper in papers {
        match evaluate(classifier, paper, min_companies) {
            Ok(Some(record)) => outcome.accepted.push(record),
            Ok(None) => outcome.rejected += 1,
            Err(e) => {
                warn!(error = %e, "Skipping record");
                outcome.malformed += 1;
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::default_classifier;
    use crate::models::Author;

    fn paper(affiliations: &[&str]) -> PaperRecord {
        PaperRecord {
            pmid: "12345".to_string(),
            title: "Test".to_string(),
            publication_date: "2024-01-01".to_string(),
            authors: affiliations
                .iter()
                .enumerate()
                .map(|(i, a)| Author::new(format!("Author {i}"), *a))
                .collect(),
        }
    }

    #[test]
    fn test_same_company_counts_once() {
        let p = paper(&["Pfizer Inc.", "Pfizer Inc.", "Pfizer Inc."]);
        assert!(evaluate(default_classifier(), &p, 2).unwrap().is_none());

        let kept = evaluate(default_classifier(), &p, 1).unwrap().unwrap();
        assert_eq!(kept.company_count, 1);
        assert_eq!(kept.companies, vec!["Pfizer Inc"]);
        assert_eq!(kept.commercial_authors.len(), 3);
    }

    #[test]
    fn test_address_after_legal_form_keeps_one_company() {
        let p = paper(&["Pfizer Inc., Groton, CT", "Pfizer Inc. Groton CT", "Pfizer Inc., New York"]);
        assert!(evaluate(default_classifier(), &p, 2).unwrap().is_none());

        let kept = evaluate(default_classifier(), &p, 1).unwrap().unwrap();
        assert_eq!(kept.company_count, 1);
        assert_eq!(kept.companies, vec!["Pfizer Inc"]);
    }

    #[test]
    fn test_dedup_is_case_insensitive() {
        let p = paper(&["Pfizer Inc., New York", "PFIZER INC, Groton"]);
        let kept = evaluate(default_classifier(), &p, 1).unwrap().unwrap();
        assert_eq!(kept.companies, vec!["Pfizer Inc"]);
    }

    #[test]
    fn test_threshold_boundary() {
        let p = paper(&["Pfizer Inc.", "Genentech Inc.", "Harvard University"]);
        assert!(evaluate(default_classifier(), &p, 2).unwrap().is_some());
        assert!(evaluate(default_classifier(), &p, 3).unwrap().is_none());
    }

    #[test]
    fn test_zero_threshold_behaves_as_one() {
        let academic = paper(&["Harvard University", "Unknown place"]);
        assert!(evaluate(default_classifier(), &academic, 0).unwrap().is_none());

        let commercial = paper(&["Genentech Inc."]);
        assert_eq!(
            evaluate(default_classifier(), &commercial, 0).unwrap(),
            evaluate(default_classifier(), &commercial, 1).unwrap()
        );
    }

    #[test]
    fn test_missing_pmid_is_malformed() {
        let mut p = paper(&["Pfizer Inc."]);
        p.pmid = "  ".to_string();
        assert!(matches!(
            evaluate(default_classifier(), &p, 1),
            Err(RecordError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_filter_papers_skips_malformed() {
        let mut broken = paper(&["Pfizer Inc."]);
        broken.pmid.clear();
        let papers =
            vec![paper(&["Pfizer Inc."]), broken, paper(&["Stanford University"])];

        let outcome = filter_papers(default_classifier(), &papers, 1);
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.rejected, 1);
        assert_eq!(outcome.malformed, 1);
    }
}
