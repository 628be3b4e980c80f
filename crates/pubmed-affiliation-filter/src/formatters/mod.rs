//! Output formatting for accepted papers.

pub mod csv;
pub mod json;
pub mod text;

pub use self::csv::{CSV_HEADERS, write_csv, write_csv_file};
pub use self::json::{paper_json, papers_json};
pub use self::text::{format_paper_text, format_papers_text};
