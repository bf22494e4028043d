//! Field extractors: one function per node-table column
//!
//! Each extractor reads a parsed [`PubmedArticle`] and returns the sanitized
//! column value. Only the journal is mandatory; every other field degrades
//! to an empty string.

use chrono::NaiveDate;
use pubnet_core::PipelineError;

use crate::parser::{DateParts, PubmedArticle};
use crate::sanitize::sanitize;
use crate::schema::{Information, Pmid};

/// Lower bound for a valid identifier (exclusive)
pub const PMID_MIN: Pmid = 100_000;
/// Upper bound for a valid identifier (exclusive)
pub const PMID_MAX: Pmid = 100_000_000;

const LIST_SEPARATOR: &str = ", ";

/// PubMed identifier from `PubmedData/ArticleIdList`.
///
/// Non-numeric text or a value outside `(PMID_MIN, PMID_MAX)` yields `None`.
pub fn pmid(article: &PubmedArticle) -> Option<Pmid> {
    let raw = article.pubmed_id.as_deref()?.trim();
    match raw.parse::<i64>() {
        Ok(value) if value > PMID_MIN as i64 && value < PMID_MAX as i64 => Some(value as Pmid),
        Ok(value) => {
            log::debug!("Identifier {value} out of range, article skipped");
            None
        }
        Err(_) => {
            log::debug!("Identifier {raw:?} is not an integer, article skipped");
            None
        }
    }
}

/// Sanitized full text of `ArticleTitle`; `None` when the element is absent
pub fn title(article: &PubmedArticle) -> Option<String> {
    article.title.as_deref().map(sanitize)
}

/// Full text of the last `Abstract` carrying leading character data
pub fn abstract_text(article: &PubmedArticle) -> String {
    article
        .abstracts
        .iter()
        .rev()
        .find(|block| block.has_leading_text)
        .map(|block| sanitize(&block.text))
        .unwrap_or_default()
}

/// Publication date as `Year-Month-Day`, written verbatim.
///
/// Priority, lowest first: accepted history date, `DateRevised`, electronic
/// `ArticleDate`. Within a source the last complete date wins.
pub fn publication_date(article: &PubmedArticle) -> String {
    let accepted = article
        .history
        .iter()
        .filter(|d| d.kind.as_deref() == Some("accepted"))
        .filter_map(|d| d.date.to_ymd())
        .next_back();
    let revised = article.date_revised.as_ref().and_then(DateParts::to_ymd);
    let electronic = article
        .article_dates
        .iter()
        .filter(|d| d.kind.as_deref() == Some("Electronic"))
        .filter_map(|d| d.date.to_ymd())
        .next_back();

    let date = electronic.or(revised).or(accepted).unwrap_or_default();
    if !date.is_empty() && !validate_date(&date) {
        log::debug!("Date {date} is not a calendar date, kept as written");
    }
    date
}

/// `"Forename Lastname"` for every author with both parts, comma-joined
pub fn authors(article: &PubmedArticle) -> String {
    let names: Vec<String> = article
        .authors
        .iter()
        .filter_map(|author| {
            let last = author.last_name.as_deref().unwrap_or_default();
            let first = author
                .fore_name
                .as_deref()
                .or(author.initials.as_deref())
                .unwrap_or_default();
            (!last.is_empty() && !first.is_empty()).then(|| format!("{first} {last}"))
        })
        .collect();

    if names.is_empty() {
        return String::new();
    }
    sanitize(&names.join(LIST_SEPARATOR))
}

/// Sanitized `Journal/Title`; every article must carry one
pub fn journal(article: &PubmedArticle, pmid: Pmid) -> Result<String, PipelineError> {
    article
        .journal_title
        .as_deref()
        .map(sanitize)
        .ok_or(PipelineError::MissingRequiredField {
            pmid,
            field: "Journal/Title",
        })
}

/// Author keywords then MeSH descriptor names, lowercased.
///
/// Duplicates are removed per whitespace token (first occurrence kept), so
/// list separators stay attached to the token before them.
pub fn keywords(article: &PubmedArticle) -> String {
    let terms: Vec<String> = article
        .keywords
        .iter()
        .map(String::as_str)
        .chain(
            article
                .mesh_descriptors
                .iter()
                .map(|d| d.name.as_str())
                .filter(|name| !name.is_empty()),
        )
        .map(sanitize)
        .collect();

    let joined = terms.join(LIST_SEPARATOR).to_lowercase();

    let mut seen = rustc_hash::FxHashSet::default();
    let tokens: Vec<&str> = joined
        .split_whitespace()
        .filter(|token| seen.insert(*token))
        .collect();
    tokens.join(" ")
}

/// PubMed identifiers of cited works, each 6 to 8 digits
pub fn references(article: &PubmedArticle) -> Vec<String> {
    article
        .references
        .iter()
        .flat_map(|reference| reference.pubmed_ids.iter())
        .filter(|id| (6..=8).contains(&id.len()) && id.bytes().all(|b| b.is_ascii_digit()))
        .cloned()
        .collect()
}

/// Whether `date` is a real calendar date in `YYYY-MM-DD` form
pub fn validate_date(date: &str) -> bool {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

/// Column extractor for one information.
///
/// `Ok(None)` means the source element is absent; only the title reports it.
pub type Extractor = fn(&PubmedArticle, Pmid) -> Result<Option<String>, PipelineError>;

/// Extractor writing the column of `info`
pub const fn extractor(info: Information) -> Extractor {
    match info {
        Information::Title => title_column,
        Information::Abstract => abstract_column,
        Information::Date => date_column,
        Information::Authors => authors_column,
        Information::Journal => journal_column,
        Information::Keywords => keywords_column,
    }
}

fn title_column(article: &PubmedArticle, _: Pmid) -> Result<Option<String>, PipelineError> {
    Ok(title(article))
}

fn abstract_column(article: &PubmedArticle, _: Pmid) -> Result<Option<String>, PipelineError> {
    Ok(Some(abstract_text(article)))
}

fn date_column(article: &PubmedArticle, _: Pmid) -> Result<Option<String>, PipelineError> {
    Ok(Some(publication_date(article)))
}

fn authors_column(article: &PubmedArticle, _: Pmid) -> Result<Option<String>, PipelineError> {
    Ok(Some(authors(article)))
}

fn journal_column(article: &PubmedArticle, pmid: Pmid) -> Result<Option<String>, PipelineError> {
    journal(article, pmid).map(Some)
}

fn keywords_column(article: &PubmedArticle, _: Pmid) -> Result<Option<String>, PipelineError> {
    Ok(Some(keywords(article)))
}
