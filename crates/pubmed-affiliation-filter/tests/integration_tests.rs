//! Integration tests against the live NCBI E-utilities.
//!
//! These tests hit the real PubMed API and need `NCBI_EMAIL` set.
//! Run with: `cargo test --features integration -- --nocapture`

#![cfg(feature = "integration")]

use pubmed_affiliation_filter::classifier::default_classifier;
use pubmed_affiliation_filter::client::{PaperSource, PubMedClient};
use pubmed_affiliation_filter::config::{Config, FilterOptions};
use pubmed_affiliation_filter::pipeline;

/// "Safety and Efficacy of the BNT162b2 mRNA Covid-19 Vaccine" (Polack et al. 2020).
const BNT162B2_PMID: &str = "33301246";

fn create_client() -> PubMedClient {
    let config = Config::from_env().expect("NCBI_EMAIL must be set");
    PubMedClient::new(config).expect("Failed to create client")
}

#[tokio::test]
async fn test_search_returns_pmids() {
    let client = create_client();
    let ids = client.search("BNT162b2 efficacy", 5).await.unwrap();
    assert!(!ids.is_empty());
    assert!(ids.len() <= 5);
}

#[tokio::test]
async fn test_fetch_known_paper() {
    let client = create_client();
    let papers = client.fetch(&[BNT162B2_PMID.to_string()]).await.unwrap();

    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].pmid, BNT162B2_PMID);
    assert!(papers[0].title.contains("BNT162b2"));
    assert!(papers[0].publication_date.starts_with("2020"));
    assert!(papers[0].authors.len() > 10);
}

#[tokio::test]
async fn test_fetch_papers_live_query() {
    let papers = create_client().fetch_papers("Moderna Therapeutics mRNA-1273", 3).await.unwrap();
    assert!(papers.iter().all(|p| !p.pmid.is_empty()));
}

#[tokio::test]
async fn test_pipeline_live_query() {
    let client = create_client();
    let options = FilterOptions { max_results: 10, ..FilterOptions::new("mRNA vaccine Pfizer") };
    let report = pipeline::run(&client, default_classifier(), &options).await.unwrap();

    println!("{}", report.summary());
    assert!(report.fetched > 0);
}
