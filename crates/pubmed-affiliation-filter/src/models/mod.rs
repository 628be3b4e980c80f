//! Data models for PubMed records and filter results.
//!
//! All models use `#[serde(rename_all = "camelCase")]`.

mod enums;
mod paper;

pub use enums::OutputFormat;
pub use paper::{Author, FilteredPaperRecord, PaperRecord};
