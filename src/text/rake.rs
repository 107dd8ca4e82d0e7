//! Rapid Automatic Keyword Extraction.
//!
//! Candidate phrases are maximal runs of content words between stopwords and
//! punctuation. Each word scores `degree / frequency` over all candidates and
//! a phrase scores the sum of its words.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::stopwords::is_stopword;

static PHRASE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.,;:!?()\[\]{}"“”‘’/\\|<>\n\r\t]+|\s[-–—]+\s"#).expect("valid regex"));

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\p{L}\p{N}][\p{L}\p{N}'-]*").expect("valid regex"));

/// A ranked keyword phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub phrase: String,
    pub score: f64,
}

/// Ranked keyword phrases of `text`, best first.
#[must_use]
pub fn extract_keywords(text: &str) -> Vec<Keyword> {
    let candidates = candidate_phrases(text);

    let mut frequency: HashMap<&str, f64> = HashMap::new();
    let mut degree: HashMap<&str, f64> = HashMap::new();
    for phrase in &candidates {
        let len = phrase.len() as f64;
        for word in phrase {
            *frequency.entry(word.as_str()).or_default() += 1.0;
            *degree.entry(word.as_str()).or_default() += len;
        }
    }

    let mut seen = HashSet::new();
    let mut keywords: Vec<Keyword> = candidates
        .iter()
        .filter_map(|phrase| {
            let joined = phrase.join(" ");
            if !seen.insert(joined.clone()) {
                return None;
            }
            let score = phrase
                .iter()
                .map(|word| degree[word.as_str()] / frequency[word.as_str()])
                .sum();
            Some(Keyword {
                phrase: joined,
                score,
            })
        })
        .collect();

    keywords.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.phrase.cmp(&b.phrase))
    });
    keywords
}

fn candidate_phrases(text: &str) -> Vec<Vec<String>> {
    let mut phrases = Vec::new();

    for fragment in PHRASE_BREAK.split(text) {
        let mut current: Vec<String> = Vec::new();
        for word in WORD.find_iter(fragment) {
            let word = word.as_str().to_lowercase();
            if is_stopword(&word) || word.chars().all(|c| c.is_ascii_digit()) {
                if !current.is_empty() {
                    phrases.push(std::mem::take(&mut current));
                }
            } else {
                current.push(word);
            }
        }
        if !current.is_empty() {
            phrases.push(current);
        }
    }

    phrases
}
