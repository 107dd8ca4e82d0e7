//! Per-unit text enrichment: local topic/keyword extraction plus one
//! throttled call to the remote semantic-analysis service.

mod semantic;
mod throttle;

pub use semantic::{
    parse_response, MeaningCloudClient, SemanticAnalysis, SemanticAnalyzer, SemanticError,
    SemanticTerm,
};
pub use throttle::RateGate;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::text::{analyze, TextAnalysis, TextConfig, TextError};

/// Local and remote analysis of one piece of text. Either half may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetEnrichment {
    pub local: Option<TextAnalysis>,
    pub semantic: Option<SemanticAnalysis>,
}

/// Result of enriching one facet, including what went wrong along the way.
#[derive(Debug, Default)]
pub struct FacetOutcome {
    pub enrichment: FacetEnrichment,
    pub local_error: Option<TextError>,
    pub semantic_error: Option<SemanticError>,
    /// The remote call was skipped because the run was cancelled.
    pub cancelled: bool,
}

/// Serializes remote analysis calls behind a [`RateGate`].
pub struct EnrichmentPipeline {
    analyzer: Option<Arc<dyn SemanticAnalyzer>>,
    gate: RateGate,
    text: TextConfig,
}

impl EnrichmentPipeline {
    /// `analyzer` may be `None` to run local analysis only.
    #[must_use]
    pub fn new(
        analyzer: Option<Arc<dyn SemanticAnalyzer>>,
        interval: Duration,
        text: TextConfig,
    ) -> Self {
        if analyzer.is_none() {
            info!("Semantic analysis disabled; only local text analysis will run");
        }
        Self {
            analyzer,
            gate: RateGate::new(interval),
            text,
        }
    }

    /// Enrich `text`, waiting for the rate gate before the remote call.
    ///
    /// Cancellation while waiting skips the remote call; the local analysis
    /// already computed is kept.
    pub async fn enrich(&self, text: &str, cancel: &CancellationToken) -> FacetOutcome {
        let mut outcome = FacetOutcome::default();

        match analyze(text, &self.text) {
            Ok(local) => outcome.enrichment.local = Some(local),
            Err(e) => outcome.local_error = Some(e),
        }

        let Some(analyzer) = &self.analyzer else {
            return outcome;
        };
        if text.trim().is_empty() {
            return outcome;
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("Cancelled before semantic analysis dispatch");
                outcome.cancelled = true;
                return outcome;
            }
            () = self.gate.acquire() => {}
        }

        match analyzer.analyze(text).await {
            Ok(semantic) => outcome.enrichment.semantic = semantic,
            Err(e) => {
                warn!("Semantic analysis failed: {e}");
                outcome.semantic_error = Some(e);
            }
        }

        outcome
    }
}
