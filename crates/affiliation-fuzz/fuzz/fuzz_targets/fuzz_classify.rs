#![no_main]

use libfuzzer_sys::fuzz_target;
use pubmed_affiliation_filter::classifier::{Classification, classify};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    // Never panics; a company name is never empty
    if let Classification::Commercial { company } = classify(&text) {
        assert!(!company.is_empty());
    }
});
