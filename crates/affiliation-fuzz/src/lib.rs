//! Fuzzing library for pubmed-affiliation-filter.
//!
//! This crate provides fuzzing targets for the affiliation classifier, the
//! efetch XML parser and the per-paper company threshold.
//!
//! # Usage
//!
//! ```bash
//! cd crates/affiliation-fuzz
//! cargo +nightly fuzz run fuzz_efetch_xml -- -max_total_time=60
//! ```

pub use pubmed_affiliation_filter::{aggregator, classifier, client::parser, models};
