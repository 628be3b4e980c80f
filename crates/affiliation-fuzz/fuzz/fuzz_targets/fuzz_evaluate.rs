#![no_main]

use libfuzzer_sys::fuzz_target;
use pubmed_affiliation_filter::aggregator::evaluate;
use pubmed_affiliation_filter::classifier::default_classifier;
use pubmed_affiliation_filter::models::{Author, PaperRecord};

fuzz_target!(|data: &[u8]| {
    let Some((&threshold, rest)) = data.split_first() else {
        return;
    };
    let text = String::from_utf8_lossy(rest);

    // One author per line
    let paper = PaperRecord {
        pmid: "1".to_string(),
        authors: text.lines().map(|line| Author::new("Fuzz", line)).collect(),
        ..PaperRecord::default()
    };

    if let Ok(Some(record)) = evaluate(default_classifier(), &paper, usize::from(threshold)) {
        assert!(record.company_count >= usize::from(threshold).max(1));
        assert_eq!(record.company_count, record.companies.len());
    }
});
