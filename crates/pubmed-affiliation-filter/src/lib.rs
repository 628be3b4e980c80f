//! PubMed Affiliation Filter
//!
//! Searches PubMed through the NCBI E-utilities and keeps the papers whose
//! authors are affiliated with pharmaceutical or biotech companies.
//!
//! # Features
//!
//! - **Keyword classifier**: commercial / academic / unknown per affiliation,
//!   with the company name pulled out of the text
//! - **Threshold filter**: keep papers naming at least N distinct companies
//! - **Rate-limited**: respects NCBI's 3 req/s (10 req/s with an API key)
//! - **Output**: CSV, JSON or console text
//!
//! # Example
//!
//! ```no_run
//! use pubmed_affiliation_filter::{
//!     PubMedClient, classifier::default_classifier, config::{Config, FilterOptions}, pipeline,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::new("me@example.com", None)?;
//!     let client = PubMedClient::new(config)?;
//!
//!     let options = FilterOptions::new("CAR-T cell therapy");
//!     let report = pipeline::run(&client, default_classifier(), &options).await?;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod models;
pub mod pipeline;

pub use classifier::{AffiliationClassifier, Classification, classify};
pub use client::{PaperSource, PubMedClient};
pub use config::{Config, FilterOptions};
pub use error::{AppError, ClientError, RecordError};
