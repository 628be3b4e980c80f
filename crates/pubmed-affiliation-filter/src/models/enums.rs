//! Enumeration types for command-line parameters.

use serde::{Deserialize, Serialize};

/// How accepted papers are rendered.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable console text.
    #[default]
    Text,
    /// Comma-separated values.
    Csv,
    /// JSON array.
    Json,
}

impl OutputFormat {
    /// Pick the format for a run: files default to CSV, the console to text.
    #[must_use]
    pub const fn resolve(requested: Option<Self>, writing_to_file: bool) -> Self {
        match requested {
            Some(Self::Text) if writing_to_file => Self::Csv,
            Some(format) => format,
            None if writing_to_file => Self::Csv,
            None => Self::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        assert_eq!(OutputFormat::resolve(None, false), OutputFormat::Text);
        assert_eq!(OutputFormat::resolve(None, true), OutputFormat::Csv);
        assert_eq!(OutputFormat::resolve(Some(OutputFormat::Text), true), OutputFormat::Csv);
        assert_eq!(OutputFormat::resolve(Some(OutputFormat::Json), true), OutputFormat::Json);
        assert_eq!(OutputFormat::resolve(Some(OutputFormat::Csv), false), OutputFormat::Csv);
    }
}
