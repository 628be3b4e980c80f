//! Search → fetch → classify → filter.

use tracing::info;

use crate::aggregator::filter_papers;
use crate::classifier::AffiliationClassifier;
use crate::client::PaperSource;
use crate::config::FilterOptions;
use crate::error::AppResult;
use crate::models::FilteredPaperRecord;

/// Summary of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterReport {
    /// Records returned by the source.
    pub fetched: usize,
    /// Records skipped as malformed.
    pub malformed: usize,
    /// Records that met the company threshold.
    pub accepted: Vec<FilteredPaperRecord>,
}

impl FilterReport {
    /// One-line summary for the user.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Fetched {} papers, {} with company affiliations.",
            self.fetched,
            self.accepted.len()
        );
        if self.malformed > 0 {
            summary.push_str(&format!(" Skipped {} malformed records.", self.malformed));
        }
        summary
    }
}

/// Run the whole pipeline for one query.
pub async fn run<S: PaperSource + ?Sized>(
    source: &S,
    classifier: &AffiliationClassifier,
    options: &FilterOptions,
) -> AppResult<FilterReport> {
    options.validate()?;

    let papers = source.fetch_papers(&options.query, options.max_results).await?;
    let outcome = filter_papers(classifier, &papers, options.min_companies);

    info!(
        fetched = papers.len(),
        accepted = outcome.accepted.len(),
        rejected = outcome.rejected,
        malformed = outcome.malformed,
        "Filtering complete"
    );

    Ok(FilterReport { fetched: papers.len(), malformed: outcome.malformed, accepted: outcome.accepted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::default_classifier;
    use crate::error::{AppError, ClientResult};
    use crate::models::{Author, PaperRecord};

    struct StaticSource(Vec<PaperRecord>);

    #[async_trait::async_trait]
    impl PaperSource for StaticSource {
        async fn fetch_papers(&self, _query: &str, max: usize) -> ClientResult<Vec<PaperRecord>> {
            Ok(self.0.iter().take(max).cloned().collect())
        }
    }

    fn paper(pmid: &str, affiliation: &str) -> PaperRecord {
        PaperRecord {
            pmid: pmid.to_string(),
            title: format!("Paper {pmid}"),
            publication_date: String::new(),
            authors: vec![Author::new("Author", affiliation)],
        }
    }

    #[tokio::test]
    async fn test_run_counts_fetched_malformed_and_accepted() {
        let source = StaticSource(vec![
            paper("1", "Pfizer Inc."),
            paper("", "Genentech Inc."),
            paper("3", "Harvard University"),
        ]);

        let report = run(&source, default_classifier(), &FilterOptions::new("oncology"))
            .await
            .unwrap();

        assert_eq!(report.fetched, 3);
        assert_eq!(report.malformed, 1);
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.accepted[0].paper.pmid, "1");
        assert!(report.summary().contains("Skipped 1 malformed"));
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_options() {
        let source = StaticSource(vec![]);
        let result = run(&source, default_classifier(), &FilterOptions::new("")).await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_zero_matches_is_not_an_error() {
        let source = StaticSource(vec![paper("9", "Stanford University")]);
        let report = run(&source, default_classifier(), &FilterOptions::new("q")).await.unwrap();
        assert!(report.accepted.is_empty());
        assert_eq!(report.summary(), "Fetched 1 papers, 0 with company affiliations.");
    }
}
