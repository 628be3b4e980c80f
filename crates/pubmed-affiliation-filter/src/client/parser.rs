//! PubMed efetch XML parsing.
//!
//! Walks a `<PubmedArticleSet>` document with a streaming `quick-xml` reader
//! and keeps the path of open elements, so that e.g. the `PMID` directly
//! under `MedlineCitation` is told apart from the ones inside
//! `CommentsCorrections`.

use std::sync::LazyLock;

use chrono::NaiveDate;
use quick_xml::Reader;
use quick_xml::events::{BytesText, Event};
use regex::Regex;
use tracing::{debug, warn};

use crate::error::ClientResult;
use crate::models::{Author, PaperRecord};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+").expect("valid email regex")
});

/// First e-mail address in a piece of text.
#[must_use]
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

#[derive(Debug, Default)]
struct DateParts {
    year: String,
    month: String,
    day: String,
}

impl DateParts {
    fn set(&mut self, field: &str, text: &str) {
        let text = text.trim();
        match field {
            "Year" => self.year = text.to_string(),
            "Month" => self.month = text.to_string(),
            "Day" => self.day = text.to_string(),
            _ => {}
        }
    }

    /// `YYYY-MM-DD`, `YYYY-MM` or `YYYY`, depending on what is present.
    fn format(&self) -> Option<String> {
        if self.year.is_empty() {
            return None;
        }
        let Some(month) = month_number(&self.month) else {
            return Some(self.year.clone());
        };

        if let (Ok(year), Ok(day)) = (self.year.parse::<i32>(), self.day.parse::<u32>()) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(date.format("%Y-%m-%d").to_string());
            }
        }
        if self.day.is_empty() {
            Some(format!("{}-{month:02}", self.year))
        } else {
            Some(format!("{}-{}-{}", self.year, self.month, self.day))
        }
    }
}

/// Month as a number, accepting `"03"`, `"3"` or `"Mar"`.
fn month_number(month: &str) -> Option<u32> {
    if let Ok(n) = month.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }
    const NAMES: [&str; 12] =
        ["jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec"];
    let prefix: String = month.chars().take(3).collect::<String>().to_lowercase();
    NAMES.iter().zip(1u32..).find(|(name, _)| **name == prefix).map(|(_, n)| n)
}

#[derive(Debug, Default)]
struct AuthorState {
    last_name: String,
    fore_name: String,
    initials: String,
    collective_name: String,
    affiliations: Vec<String>,
    affiliation: Option<String>,
}

impl AuthorState {
    fn finish(self) -> Author {
        let name = match (self.fore_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.fore_name, self.last_name),
            (true, false) if !self.initials.is_empty() => {
                format!("{} {}", self.initials, self.last_name)
            }
            (true, false) => self.last_name,
            (false, true) => self.fore_name,
            (true, true) => self.collective_name,
        };
        let email = self.affiliations.iter().find_map(|a| extract_email(a));
        Author { name: normalize(&name), affiliations: self.affiliations, email }
    }
}

#[derive(Debug, Default)]
struct ArticleState {
    pmid: Option<String>,
    title: String,
    article_date: DateParts,
    pub_date: DateParts,
    medline_date: String,
    authors: Vec<Author>,
    author: Option<AuthorState>,
}

impl ArticleState {
    fn finish(self) -> PaperRecord {
        let publication_date = self
            .article_date
            .format()
            .or_else(|| self.pub_date.format())
            .unwrap_or_else(|| self.medline_date.trim().to_string());

        PaperRecord {
            pmid: self.pmid.unwrap_or_default(),
            title: normalize(&self.title),
            publication_date,
            authors: self.authors,
        }
    }
}

/// Collapse runs of whitespace and trim.
fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn ends_with(path: &[String], suffix: &[&str]) -> bool {
    path.len() >= suffix.len()
        && path[path.len() - suffix.len()..].iter().zip(suffix).all(|(a, b)| a == b)
}

fn inside(path: &[String], element: &str) -> bool {
    path.iter().any(|p| p == element)
}

fn text_of(e: &BytesText<'_>) -> String {
    e.unescape()
        .map(|t| t.into_owned())
        .unwrap_or_else(|_| String::from_utf8_lossy(e).into_owned())
}

/// Parse an efetch `PubmedArticleSet` document.
///
/// Articles without a PMID are still returned (with an empty `pmid`) so the
/// caller can report them.
pub fn parse_pubmed_xml(xml: &str) -> ClientResult<Vec<PaperRecord>> {
    let mut reader = Reader::from_str(xml);
    let mut papers = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut current: Option<ArticleState> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                path.push(name);
                let name = path.last().map(String::as_str).unwrap_or_default();

                match name {
                    "PubmedArticle" => current = Some(ArticleState::default()),
                    "Author" if ends_with(&path, &["AuthorList", "Author"]) => {
                        if let Some(article) = current.as_mut() {
                            article.author = Some(AuthorState::default());
                        }
                    }
                    "Affiliation" => {
                        if let Some(author) = current.as_mut().and_then(|a| a.author.as_mut()) {
                            author.affiliation = Some(String::new());
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(e) => {
                let Some(article) = current.as_mut() else {
                    continue;
                };
                let text = text_of(&e);
                handle_text(article, &path, &text);
            }
            Event::CData(e) => {
                let Some(article) = current.as_mut() else {
                    continue;
                };
                let text = String::from_utf8_lossy(&e).into_owned();
                handle_text(article, &path, &text);
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match name.as_str() {
                    "Affiliation" => {
                        if let Some(author) = current.as_mut().and_then(|a| a.author.as_mut()) {
                            if let Some(text) = author.affiliation.take() {
                                let text = normalize(&text);
                                if !text.is_empty() {
                                    author.affiliations.push(text);
                                }
                            }
                        }
                    }
                    "Author" if ends_with(&path, &["AuthorList", "Author"]) => {
                        if let Some(article) = current.as_mut() {
                            if let Some(author) = article.author.take() {
                                article.authors.push(author.finish());
                            }
                        }
                    }
                    "PubmedArticle" => {
                        if let Some(article) = current.take() {
                            let paper = article.finish();
                            if paper.pmid.is_empty() {
                                warn!(title = %paper.title, "PubMed article without PMID");
                            }
                            papers.push(paper);
                        }
                    }
                    _ => {}
                }
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    debug!(count = papers.len(), "Parsed PubMed articles");
    Ok(papers)
}

fn handle_text(article: &mut ArticleState, path: &[String], text: &str) {
    let Some(leaf) = path.last().map(String::as_str) else {
        return;
    };

    if ends_with(path, &["MedlineCitation", "PMID"]) {
        if article.pmid.is_none() {
            article.pmid = Some(text.trim().to_string());
        }
    } else if inside(path, "ArticleTitle") {
        article.title.push_str(text);
    } else if ends_with(path, &["ArticleDate", leaf]) {
        article.article_date.set(leaf, text);
    } else if ends_with(path, &["PubDate", "MedlineDate"]) {
        article.medline_date.push_str(text);
    } else if ends_with(path, &["PubDate", leaf]) {
        article.pub_date.set(leaf, text);
    } else if let Some(author) = article.author.as_mut() {
        if let Some(affiliation) = author.affiliation.as_mut() {
            affiliation.push_str(text);
            return;
        }
        let field = match leaf {
            "LastName" => &mut author.last_name,
            "ForeName" => &mut author.fore_name,
            "Initials" => &mut author.initials,
            "CollectiveName" => &mut author.collective_name,
            _ => return,
        };
        field.push_str(text.trim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_number() {
        assert_eq!(month_number("03"), Some(3));
        assert_eq!(month_number("Sep"), Some(9));
        assert_eq!(month_number("December"), Some(12));
        assert_eq!(month_number("13"), None);
        assert_eq!(month_number(""), None);
    }

    #[test]
    fn test_date_formatting() {
        let full = DateParts { year: "2023".into(), month: "Mar".into(), day: "5".into() };
        assert_eq!(full.format().as_deref(), Some("2023-03-05"));

        let month_only = DateParts { year: "2023".into(), month: "11".into(), day: String::new() };
        assert_eq!(month_only.format().as_deref(), Some("2023-11"));

        let invalid = DateParts { year: "2023".into(), month: "02".into(), day: "30".into() };
        assert_eq!(invalid.format().as_deref(), Some("2023-02-30"));

        assert_eq!(DateParts::default().format(), None);
    }

    #[test]
    fn test_extract_email() {
        assert_eq!(
            extract_email("Genentech Inc. Electronic address: jane.doe@gene.com.").as_deref(),
            Some("jane.doe@gene.com")
        );
        assert_eq!(extract_email("Harvard University"), None);
    }

    #[test]
    fn test_parse_minimal_article() {
        let xml = r#"<?xml version="1.0"?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation>
      <PMID Version="1">12345678</PMID>
      <Article>
        <Journal><JournalIssue><PubDate><Year>2021</Year><Month>Jun</Month></PubDate></JournalIssue></Journal>
        <ArticleTitle>KRAS G12D in pancreatic cancer</ArticleTitle>
        <AuthorList>
          <Author><LastName>Smith</LastName><ForeName>John</ForeName>
            <AffiliationInfo><Affiliation>Pfizer Inc., New York, USA.</Affiliation></AffiliationInfo>
          </Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

        let papers = parse_pubmed_xml(xml).unwrap();
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].pmid, "12345678");
        assert_eq!(papers[0].title, "KRAS G12D in pancreatic cancer");
        assert_eq!(papers[0].publication_date, "2021-06");
        assert_eq!(papers[0].authors[0].name, "John Smith");
        assert_eq!(papers[0].authors[0].affiliations, vec!["Pfizer Inc., New York, USA."]);
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let xml = "<PubmedArticleSet><PubmedArticle></Wrong></PubmedArticleSet>";
        assert!(parse_pubmed_xml(xml).is_err());
    }
}
