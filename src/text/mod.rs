//! Offline text analysis: markup stripping, sentence splitting, keyword
//! ranking and topic extraction.

mod lda;
mod rake;
mod stopwords;

pub use lda::{extract_topics, LdaParams, Topic, TopicTerm};
pub use rake::{extract_keywords, Keyword};

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use stopwords::is_stopword;

static SENTENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("valid regex"));

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\p{L}\p{N}][\p{L}\p{N}']*").expect("valid regex"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextError {
    #[error("text contains no analyzable terms")]
    NoTerms,
}

/// Local analysis settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextConfig {
    pub lda: LdaParams,
}

impl From<&Config> for TextConfig {
    fn from(config: &Config) -> Self {
        Self {
            lda: LdaParams {
                topics: config.topic_count,
                terms_per_topic: config.terms_per_topic,
                ..LdaParams::default()
            },
        }
    }
}

/// Topics and keywords extracted from one piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub topics: Vec<Topic>,
    pub keywords: Vec<Keyword>,
}

/// Run topic extraction over the sentences of `text` and keyword ranking over
/// the whole of it.
///
/// # Errors
///
/// Returns [`TextError::NoTerms`] when nothing but stopwords, numbers and
/// punctuation remains.
pub fn analyze(text: &str, config: &TextConfig) -> Result<TextAnalysis, TextError> {
    let documents: Vec<Vec<String>> = split_sentences(text)
        .into_iter()
        .map(tokenize)
        .filter(|tokens| !tokens.is_empty())
        .collect();

    if documents.is_empty() {
        return Err(TextError::NoTerms);
    }

    Ok(TextAnalysis {
        topics: extract_topics(&documents, &config.lda),
        keywords: extract_keywords(text),
    })
}

/// Split text into sentences ending in `.`, `!` or `?`.
///
/// Trailing text without a terminator becomes the final sentence.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut end = 0;
    for m in SENTENCE.find_iter(text) {
        sentences.push(m.as_str().trim());
        end = m.end();
    }
    sentences.push(text[end..].trim());
    sentences.retain(|s| !s.is_empty());
    sentences
}

/// Lowercased content words of `text`.
fn tokenize(text: &str) -> Vec<String> {
    TOKEN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|word| word.chars().count() > 1)
        .filter(|word| !is_stopword(word))
        .filter(|word| !word.chars().all(|c| c.is_ascii_digit()))
        .collect()
}

/// Plain text of an HTML fragment with whitespace collapsed.
#[must_use]
pub fn strip_markup(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
