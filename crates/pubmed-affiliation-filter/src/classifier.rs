//! Affiliation classifier.
//!
//! Decides whether a free-text PubMed affiliation names a pharmaceutical or
//! biotech company, an academic/governmental body, or neither.
//!
//! Matching is keyword based and works on words, not raw substrings, so
//! `"Princeton"` does not trigger `inc` and `"Denver, CO"` does not trigger
//! `Co.`. Commercial keywords are checked first: if any clause of the text
//! carries one, the affiliation is [`Classification::Commercial`] even when it
//! also names a university or institute.
//!
//! ```
//! use pubmed_affiliation_filter::classifier::{classify, Classification};
//!
//! assert_eq!(
//!     classify("Genentech Inc., South San Francisco, CA"),
//!     Classification::Commercial { company: "Genentech Inc".to_string() },
//! );
//! assert_eq!(classify("Dept. of Oncology, Stanford University"), Classification::Academic);
//! assert_eq!(classify(""), Classification::Unknown);
//! ```

use std::sync::LazyLock;

use serde::Serialize;

/// Result of classifying one affiliation string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Classification {
    /// A pharmaceutical or biotech company.
    Commercial {
        /// Company name as written in the affiliation.
        company: String,
    },
    /// A university, hospital, institute or government body.
    Academic,
    /// No recognised keyword.
    Unknown,
}

impl Classification {
    /// Check if this is a commercial affiliation.
    #[must_use]
    pub const fn is_commercial(&self) -> bool {
        matches!(self, Self::Commercial { .. })
    }

    /// Get the company name for commercial affiliations.
    #[must_use]
    pub fn company(&self) -> Option<&str> {
        match self {
            Self::Commercial { company } => Some(company),
            _ => None,
        }
    }
}

/// How a keyword is compared with a lower-cased word token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Token equals the keyword.
    Word,
    /// Token starts with the keyword (`univers` matches `universität`).
    Prefix,
    /// Token ends with the keyword, optionally followed by a plural `s`
    /// (`pharmaceutical` matches `biopharmaceuticals`).
    Suffix,
    /// Token equals the keyword and is written with a trailing period right
    /// after `&`, `and` or another commercial word (`Merck & Co.`,
    /// `Takeda Pharmaceutical Co.`). Only the `&`/`and` form may be all
    /// capitals, so the state code in `Aurora CO.` never matches.
    Abbreviation,
}

/// A single keyword or a multi-word phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    words: Vec<String>,
    rule: MatchRule,
    generic: bool,
}

impl Keyword {
    fn with_rule(text: &str, rule: MatchRule) -> Self {
        Self {
            words: text.split_whitespace().map(str::to_lowercase).collect(),
            rule,
            generic: false,
        }
    }

    /// Exact word, or an exact phrase when `text` has several words.
    #[must_use]
    pub fn word(text: &str) -> Self {
        Self::with_rule(text, MatchRule::Word)
    }

    /// Word prefix.
    #[must_use]
    pub fn prefix(text: &str) -> Self {
        Self::with_rule(text, MatchRule::Prefix)
    }

    /// Word suffix.
    #[must_use]
    pub fn suffix(text: &str) -> Self {
        Self::with_rule(text, MatchRule::Suffix)
    }

    /// Abbreviation that must carry a trailing period.
    #[must_use]
    pub fn abbreviation(text: &str) -> Self {
        Self::with_rule(text, MatchRule::Abbreviation)
    }

    /// Mark a commercial keyword as a generic noun: it is ignored right after
    /// `of`, `for`, `and` or `&` ("School of Biosciences").
    #[must_use]
    pub fn generic(mut self) -> Self {
        self.generic = true;
        self
    }

    fn matches_token(&self, token: &str) -> bool {
        let Some(keyword) = self.words.first() else {
            return false;
        };
        match self.rule {
            MatchRule::Word | MatchRule::Abbreviation => token == keyword,
            MatchRule::Prefix => token.starts_with(keyword.as_str()),
            MatchRule::Suffix => {
                token.ends_with(keyword.as_str())
                    || token.strip_suffix('s').is_some_and(|t| t.ends_with(keyword.as_str()))
            }
        }
    }

    /// Phrase or single-word match anywhere in a token sequence.
    fn matches_tokens(&self, tokens: &[&str]) -> bool {
        match self.words.len() {
            0 => false,
            1 => tokens.iter().any(|t| self.matches_token(t)),
            n => tokens
                .windows(n)
                .any(|window| window.iter().zip(&self.words).all(|(t, w)| *t == w.as_str())),
        }
    }
}

/// Immutable keyword configuration for an [`AffiliationClassifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    /// Company legal forms (`Inc`, `GmbH`, ...). Single words only.
    pub legal_forms: Vec<Keyword>,
    /// Industry words (`Pharma`, `Therapeutics`, ...). Single words only.
    pub industry: Vec<Keyword>,
    /// Academic and governmental words or phrases.
    pub academic: Vec<Keyword>,
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self {
            legal_forms: vec![
                Keyword::word("inc"),
                Keyword::word("incorporated"),
                Keyword::word("ltd"),
                Keyword::word("limited"),
                Keyword::word("llc"),
                Keyword::word("corp"),
                Keyword::word("corporation"),
                Keyword::word("company"),
                Keyword::word("gmbh"),
                Keyword::word("ag"),
                Keyword::word("plc"),
                Keyword::abbreviation("co"),
            ],
            industry: vec![
                Keyword::suffix("pharma"),
                Keyword::suffix("pharmaceutical"),
                Keyword::suffix("therapeutics"),
                Keyword::word("biotech"),
                Keyword::word("biosciences").generic(),
                Keyword::word("laboratories").generic(),
                Keyword::word("labs").generic(),
                Keyword::word("technologies").generic(),
            ],
            academic: vec![
                Keyword::prefix("univers"),
                Keyword::prefix("institut"),
                Keyword::word("college"),
                Keyword::word("school"),
                Keyword::prefix("hospital"),
                Keyword::word("clinic"),
                Keyword::word("clinics"),
                Keyword::word("foundation"),
                Keyword::prefix("academ"),
                Keyword::prefix("facult"),
                Keyword::word("national"),
                Keyword::word("federal"),
                Keyword::word("department of"),
                Keyword::word("dept of"),
                Keyword::word("school of medicine"),
                Keyword::word("medical center"),
                Keyword::word("medical centre"),
                Keyword::word("cancer center"),
                Keyword::word("cancer centre"),
                Keyword::word("research center"),
                Keyword::word("research centre"),
                Keyword::word("national laboratory"),
                Keyword::word("ministry of"),
            ],
        }
    }
}

/// One whitespace-separated word of a clause.
#[derive(Debug)]
struct Word<'a> {
    raw: &'a str,
    core: &'a str,
    tokens: Vec<String>,
    abbreviated: bool,
}

impl<'a> Word<'a> {
    fn parse(raw: &'a str) -> Self {
        let is_edge = |c: char| !c.is_alphanumeric() && c != '&';
        let core = raw.trim_matches(is_edge);
        let trailing = &raw.trim_start_matches(is_edge)[core.len()..];
        let tokens = core
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self { raw, core, tokens, abbreviated: trailing.starts_with('.') }
    }

    fn is_capitalised(&self) -> bool {
        self.core
            .chars()
            .find(|c| c.is_alphanumeric())
            .is_some_and(|c| c.is_uppercase() || c.is_numeric())
    }

    fn is_numeric(&self) -> bool {
        !self.tokens.is_empty() && self.tokens.iter().all(|t| t.chars().all(char::is_numeric))
    }

    fn is_connector(&self) -> bool {
        self.core == "&" || self.core.eq_ignore_ascii_case("and") || self.core.eq_ignore_ascii_case("of")
    }

    fn is_linking(&self) -> bool {
        self.is_connector() || self.core.eq_ignore_ascii_case("for")
    }
}

/// Words of one comma-separated clause, e-mail addresses removed.
fn clause_words(clause: &str) -> Vec<Word<'_>> {
    clause
        .split_whitespace()
        .filter(|raw| !raw.contains('@'))
        .map(Word::parse)
        .filter(|w| !w.core.is_empty())
        .collect()
}

/// Keyword-based affiliation classifier.
#[derive(Debug, Clone, Default)]
pub struct AffiliationClassifier {
    keywords: KeywordSet,
}

static DEFAULT_CLASSIFIER: LazyLock<AffiliationClassifier> =
    LazyLock::new(AffiliationClassifier::default);

/// Classify with the built-in keyword set.
#[must_use]
pub fn classify(text: &str) -> Classification {
    DEFAULT_CLASSIFIER.classify(text)
}

/// The classifier backing [`classify`].
#[must_use]
pub fn default_classifier() -> &'static AffiliationClassifier {
    &DEFAULT_CLASSIFIER
}

/// Case- and punctuation-insensitive key for comparing company names.
#[must_use]
pub fn company_key(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

impl AffiliationClassifier {
    /// Create a classifier with a custom keyword set.
    #[must_use]
    pub const fn new(keywords: KeywordSet) -> Self {
        Self { keywords }
    }

    /// Classify one affiliation string. Never fails.
    #[must_use]
    pub fn classify(&self, text: &str) -> Classification {
        let fragments: Vec<Vec<Vec<Word<'_>>>> = text
            .split(';')
            .map(|fragment| fragment.split(',').map(clause_words).collect())
            .collect();

        for clauses in &fragments {
            for (index, words) in clauses.iter().enumerate() {
                if let Some(hit) = self.first_commercial_word(words) {
                    let previous = index.checked_sub(1).map(|i| clauses[i].as_slice());
                    let company = self.company_name(words, hit, previous);
                    return Classification::Commercial { company };
                }
            }
        }

        let academic = fragments.iter().flatten().any(|words| {
            let tokens: Vec<&str> =
                words.iter().flat_map(|w| w.tokens.iter().map(String::as_str)).collect();
            self.keywords.academic.iter().any(|k| k.matches_tokens(&tokens))
        });

        if academic { Classification::Academic } else { Classification::Unknown }
    }

    fn commercial_keywords(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.legal_forms.iter().chain(&self.keywords.industry)
    }

    fn word_matches(&self, keyword: &Keyword, words: &[Word<'_>], index: usize) -> bool {
        let word = &words[index];
        if keyword.words.len() != 1 || !word.tokens.iter().any(|t| keyword.matches_token(t)) {
            return false;
        }
        if keyword.rule == MatchRule::Abbreviation && !self.is_abbreviation(words, index) {
            return false;
        }
        if keyword.generic && index > 0 && words[index - 1].is_linking() {
            return false;
        }
        true
    }

    /// `Co.` after `&`/`and`, or `Co.` (not `CO.`) after another commercial word.
    fn is_abbreviation(&self, words: &[Word<'_>], index: usize) -> bool {
        let word = &words[index];
        if !word.abbreviated || index == 0 {
            return false;
        }
        let previous = &words[index - 1];
        if previous.core == "&" || previous.core.eq_ignore_ascii_case("and") {
            return true;
        }
        word.core.chars().any(char::is_lowercase) && self.is_commercial_word(words, index - 1)
    }

    fn is_commercial_word(&self, words: &[Word<'_>], index: usize) -> bool {
        self.commercial_keywords().any(|k| self.word_matches(k, words, index))
    }

    fn first_commercial_word(&self, words: &[Word<'_>]) -> Option<usize> {
        (0..words.len()).find(|&i| self.is_commercial_word(words, i))
    }

    fn is_legal_form(&self, word: &Word<'_>) -> bool {
        self.keywords
            .legal_forms
            .iter()
            .any(|k| word.tokens.len() == 1 && k.matches_token(&word.tokens[0]))
    }

    fn is_name_word(&self, words: &[Word<'_>], index: usize) -> bool {
        let word = &words[index];
        if word.is_numeric() {
            return false;
        }
        word.is_capitalised() || self.is_commercial_word(words, index)
    }

    /// Bounds of the contiguous name run around `index`.
    fn name_run(&self, words: &[Word<'_>], index: usize) -> (usize, usize) {
        let mut start = index;
        loop {
            if start >= 1 && self.is_name_word(words, start - 1) {
                start -= 1;
            } else if start >= 2
                && words[start - 1].is_connector()
                && self.is_name_word(words, start - 2)
            {
                start -= 2;
            } else {
                break;
            }
        }

        // A legal form closes the name; only further legal forms may follow it.
        let mut end = index;
        loop {
            if self.is_legal_form(&words[end]) {
                while end + 1 < words.len() && self.is_legal_form(&words[end + 1]) {
                    end += 1;
                }
                break;
            }
            if end + 1 < words.len() && self.is_name_word(words, end + 1) {
                end += 1;
            } else if end + 2 < words.len()
                && words[end + 1].is_connector()
                && self.is_name_word(words, end + 2)
            {
                end += 2;
            } else {
                break;
            }
        }

        (start, end)
    }

    /// Trailing name run of a clause (the company before a split-off `Inc.`).
    fn trailing_name(&self, words: &[Word<'_>]) -> Option<String> {
        let last = words.len().checked_sub(1)?;
        if !words[last].is_capitalised() {
            return None;
        }
        let (start, end) = self.name_run(words, last);
        Some(join_words(&words[start..=end]))
    }

    fn company_name(
        &self,
        words: &[Word<'_>],
        hit: usize,
        previous: Option<&[Word<'_>]>,
    ) -> String {
        if words.iter().all(|w| self.is_legal_form(w)) {
            if let Some(name) = previous.and_then(|p| self.trailing_name(p)) {
                return trim_name(&format!("{name}, {}", join_words(words)));
            }
        }

        let (start, end) = self.name_run(words, hit);
        let run = &words[start..=end];
        if run.iter().any(Word::is_capitalised) {
            trim_name(&join_words(run))
        } else {
            trim_name(&join_words(words))
        }
    }
}

fn join_words(words: &[Word<'_>]) -> String {
    words.iter().map(|w| w.raw).collect::<Vec<_>>().join(" ")
}

fn trim_name(name: &str) -> String {
    name.trim_matches(|c: char| !c.is_alphanumeric()).to_string()
}
