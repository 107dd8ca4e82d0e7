//! Latent Dirichlet Allocation by collapsed Gibbs sampling.
//!
//! Sentences are the documents. Sampling is driven by a seeded RNG so a given
//! input always yields the same topics.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// One term of a topic and its weight within that topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicTerm {
    pub term: String,
    pub probability: f64,
}

/// The most probable terms of one topic, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub terms: Vec<TopicTerm>,
}

#[derive(Debug, Clone, Copy)]
pub struct LdaParams {
    pub topics: usize,
    pub terms_per_topic: usize,
    pub iterations: usize,
    pub alpha: f64,
    pub beta: f64,
    pub seed: u64,
}

impl Default for LdaParams {
    fn default() -> Self {
        Self {
            topics: 2,
            terms_per_topic: 5,
            iterations: 1000,
            alpha: 0.1,
            beta: 0.01,
            seed: 0x00b0_a2d5,
        }
    }
}

/// Fit `params.topics` topics over tokenized documents.
///
/// Returns no topics when the documents hold no tokens.
#[must_use]
pub fn extract_topics(documents: &[Vec<String>], params: &LdaParams) -> Vec<Topic> {
    let k = params.topics;
    if k == 0 {
        return Vec::new();
    }

    let mut vocab: Vec<&str> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let docs: Vec<Vec<usize>> = documents
        .iter()
        .map(|doc| {
            doc.iter()
                .map(|token| {
                    *index.entry(token.as_str()).or_insert_with(|| {
                        vocab.push(token.as_str());
                        vocab.len() - 1
                    })
                })
                .collect()
        })
        .collect();

    let v = vocab.len();
    if v == 0 {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut word_topic = vec![vec![0usize; k]; v];
    let mut doc_topic = vec![vec![0usize; k]; docs.len()];
    let mut topic_total = vec![0usize; k];

    let mut assignments: Vec<Vec<usize>> = docs
        .iter()
        .enumerate()
        .map(|(d, doc)| {
            doc.iter()
                .map(|&w| {
                    let z = rng.gen_range(0..k);
                    word_topic[w][z] += 1;
                    doc_topic[d][z] += 1;
                    topic_total[z] += 1;
                    z
                })
                .collect()
        })
        .collect();

    let v_beta = v as f64 * params.beta;
    let mut weights = vec![0.0f64; k];

    for _ in 0..params.iterations {
        for (d, doc) in docs.iter().enumerate() {
            for (i, &w) in doc.iter().enumerate() {
                let old = assignments[d][i];
                word_topic[w][old] -= 1;
                doc_topic[d][old] -= 1;
                topic_total[old] -= 1;

                let mut total = 0.0;
                for (t, weight) in weights.iter_mut().enumerate() {
                    *weight = (word_topic[w][t] as f64 + params.beta)
                        / (topic_total[t] as f64 + v_beta)
                        * (doc_topic[d][t] as f64 + params.alpha);
                    total += *weight;
                }

                let mut target = rng.gen::<f64>() * total;
                let mut new = k - 1;
                for (t, weight) in weights.iter().enumerate() {
                    target -= weight;
                    if target <= 0.0 {
                        new = t;
                        break;
                    }
                }

                assignments[d][i] = new;
                word_topic[w][new] += 1;
                doc_topic[d][new] += 1;
                topic_total[new] += 1;
            }
        }
    }

    (0..k)
        .map(|t| {
            let denominator = topic_total[t] as f64 + v_beta;
            let mut terms: Vec<TopicTerm> = vocab
                .iter()
                .enumerate()
                .map(|(w, term)| TopicTerm {
                    term: (*term).to_string(),
                    probability: (word_topic[w][t] as f64 + params.beta) / denominator,
                })
                .collect();
            terms.sort_by(|a, b| {
                b.probability
                    .total_cmp(&a.probability)
                    .then_with(|| a.term.cmp(&b.term))
            });
            terms.truncate(params.terms_per_topic);
            Topic { terms }
        })
        .collect()
}
