//! Client for the third-party semantic-analysis (topics extraction) service.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum SemanticError {
    #[error("semantic analysis request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("semantic analysis response was malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// An entity or concept found in the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticTerm {
    pub form: String,
    pub relevance: f64,
    /// Ontology path, e.g. `["Top", "Organization", "Company"]`.
    pub hierarchy: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticAnalysis {
    pub entities: Vec<SemanticTerm>,
    pub concepts: Vec<SemanticTerm>,
}

/// A remote service that extracts entities and concepts from text.
#[async_trait]
pub trait SemanticAnalyzer: Send + Sync {
    /// Analyze `text`.
    ///
    /// `Ok(None)` means the service declined (non-success HTTP status or a
    /// non-zero service status code); the caller should skip enrichment.
    async fn analyze(&self, text: &str) -> Result<Option<SemanticAnalysis>, SemanticError>;
}

/// MeaningCloud-style topics extraction over form-encoded POST.
pub struct MeaningCloudClient {
    client: Client,
    endpoint: String,
    key: String,
    lang: String,
    topic_types: String,
}

impl MeaningCloudClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        key: impl Into<String>,
        lang: impl Into<String>,
        topic_types: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build semantic analysis HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            key: key.into(),
            lang: lang.into(),
            topic_types: topic_types.into(),
        })
    }

    /// Build a client from configuration; `None` when no API key is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> anyhow::Result<Option<Self>> {
        let Some(key) = config.semantic_api_key.as_deref() else {
            return Ok(None);
        };
        Self::new(
            config.semantic_api_url.as_str(),
            key,
            config.semantic_lang.as_str(),
            config.semantic_topic_types.as_str(),
            config.http_timeout,
        )
        .map(Some)
    }
}

#[async_trait]
impl SemanticAnalyzer for MeaningCloudClient {
    async fn analyze(&self, text: &str) -> Result<Option<SemanticAnalysis>, SemanticError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[
                ("key", self.key.as_str()),
                ("lang", self.lang.as_str()),
                ("txt", text),
                ("tt", self.topic_types.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Semantic analysis returned non-success status");
            return Ok(None);
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    status: Option<RawStatus>,
    #[serde(default)]
    entity_list: Vec<RawTerm>,
    #[serde(default)]
    concept_list: Vec<RawTerm>,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    #[serde(default)]
    code: Value,
    #[serde(default)]
    msg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTerm {
    form: String,
    #[serde(default)]
    relevance: Value,
    #[serde(default)]
    sementity: Option<RawSementity>,
}

#[derive(Debug, Deserialize)]
struct RawSementity {
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// Parse a service response body.
///
/// # Errors
///
/// Returns [`SemanticError::Malformed`] if the body is not the expected JSON.
pub fn parse_response(body: &str) -> Result<Option<SemanticAnalysis>, SemanticError> {
    let raw: RawResponse = serde_json::from_str(body)?;

    let Some(status) = raw.status else {
        warn!("Semantic analysis response carried no status");
        return Ok(None);
    };
    if as_number(&status.code) != Some(0.0) {
        debug!(
            code = %status.code,
            msg = status.msg.as_deref().unwrap_or(""),
            "Semantic analysis declined the request"
        );
        return Ok(None);
    }

    Ok(Some(SemanticAnalysis {
        entities: raw.entity_list.into_iter().map(RawTerm::into_term).collect(),
        concepts: raw.concept_list.into_iter().map(RawTerm::into_term).collect(),
    }))
}

impl RawTerm {
    fn into_term(self) -> SemanticTerm {
        let hierarchy = self
            .sementity
            .and_then(|s| s.kind)
            .map(|kind| {
                kind.split('>')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        SemanticTerm {
            form: self.form,
            relevance: as_number(&self.relevance).unwrap_or(0.0),
            hierarchy,
        }
    }
}

/// The service sends numbers either as JSON numbers or numeric strings.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
