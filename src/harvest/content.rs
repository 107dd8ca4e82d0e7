//! Pin content harvesting: gather pin text, scrape linked articles with
//! bounded concurrency, then enrich each facet through the throttled
//! pipeline.

use std::sync::Arc;

use anyhow::Result;
use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::article::{ArticleScraper, HttpArticleScraper, ScrapedArticle};
use crate::config::Config;
use crate::db::{get_pin_contents_on_board, PinContent};
use crate::enrichment::{
    EnrichmentPipeline, FacetEnrichment, FacetOutcome, MeaningCloudClient, SemanticAnalyzer,
};
use crate::text::TextConfig;

/// Which text of a pin was enriched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    /// Title, note and body written by the user.
    User,
    /// Text of the linked article.
    Url,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Scrape,
    LocalAnalysis,
    SemanticAnalysis,
}

/// Something that went wrong for one pin without failing the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFailure {
    pub pin_id: i64,
    pub facet: Option<Facet>,
    pub stage: FailureStage,
    pub message: String,
}

/// A pin's text with its scraped article and enrichment results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedContentUnit {
    pub pin_id: i64,
    pub board_id: i64,
    pub title: Option<String>,
    pub user_note: Option<String>,
    pub body: Option<String>,
    pub url: Option<String>,
    pub user_content: String,
    /// Scraped article text, when there is any.
    pub url_content: Option<String>,
    pub article: Option<ScrapedArticle>,
    pub user: FacetEnrichment,
    pub url_facet: Option<FacetEnrichment>,
}

impl EnrichedContentUnit {
    fn new(pin: PinContent, article: Option<ScrapedArticle>) -> Self {
        let user_content = pin.user_content();
        let url = pin.url().map(str::to_string);
        let url_content = article
            .as_ref()
            .map(|a| a.text.trim())
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        Self {
            pin_id: pin.id,
            board_id: pin.board_id,
            title: pin.title,
            user_note: pin.user_note,
            body: pin.body,
            url,
            user_content,
            url_content,
            article,
            user: FacetEnrichment::default(),
            url_facet: None,
        }
    }
}

/// Outcome of a content harvest: every unit gathered, plus per-unit failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HarvestReport {
    pub units: Vec<EnrichedContentUnit>,
    pub failures: Vec<UnitFailure>,
    /// Enrichment stopped early; units after the cut are not enriched.
    pub cancelled: bool,
}

/// Harvests and enriches pin content for one or more boards.
pub struct ContentHarvester {
    pool: SqlitePool,
    scraper: Arc<dyn ArticleScraper>,
    pipeline: EnrichmentPipeline,
    scrape_concurrency: usize,
}

impl ContentHarvester {
    #[must_use]
    pub fn new(
        pool: SqlitePool,
        scraper: Arc<dyn ArticleScraper>,
        pipeline: EnrichmentPipeline,
        scrape_concurrency: usize,
    ) -> Self {
        Self {
            pool,
            scraper,
            pipeline,
            scrape_concurrency: scrape_concurrency.max(1),
        }
    }

    /// Wire up the HTTP scraper and, if an API key is configured, the remote
    /// semantic analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_config(pool: SqlitePool, config: &Config) -> Result<Self> {
        let scraper = Arc::new(HttpArticleScraper::new(config.http_timeout)?);
        let analyzer = MeaningCloudClient::from_config(config)?
            .map(|client| Arc::new(client) as Arc<dyn SemanticAnalyzer>);
        let pipeline =
            EnrichmentPipeline::new(analyzer, config.enrich_interval, TextConfig::from(config));

        Ok(Self::new(pool, scraper, pipeline, config.scrape_concurrency))
    }

    /// Gather, scrape and enrich the content of every live pin on `board_ids`.
    ///
    /// Units come back in board order, then pin order. Scrape and analysis
    /// failures are collected in the report; only query failures are errors.
    /// Cancelling `cancel` stops scraping and enrichment between dispatches.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin query fails.
    pub async fn harvest_board_content(
        &self,
        board_ids: &[i64],
        cancel: &CancellationToken,
    ) -> Result<HarvestReport> {
        let mut pins = Vec::new();
        for &board_id in board_ids {
            pins.extend(get_pin_contents_on_board(&self.pool, board_id).await?);
        }
        info!(boards = board_ids.len(), pins = pins.len(), "Harvesting board content");

        let mut report = HarvestReport::default();

        let scraped: Vec<(PinContent, Option<Result<ScrapedArticle>>)> = stream::iter(pins)
            .map(|pin| async move {
                let article = match pin.url() {
                    Some(url) if !cancel.is_cancelled() => Some(self.scraper.scrape(url).await),
                    _ => None,
                };
                (pin, article)
            })
            .buffered(self.scrape_concurrency)
            .collect()
            .await;

        let mut units = Vec::with_capacity(scraped.len());
        for (pin, article) in scraped {
            let article = match article {
                Some(Ok(article)) => Some(article),
                Some(Err(e)) => {
                    warn!(
                        pin_id = pin.id,
                        url = pin.url().unwrap_or(""),
                        "Scrape failed: {e:#}"
                    );
                    report.failures.push(UnitFailure {
                        pin_id: pin.id,
                        facet: Some(Facet::Url),
                        stage: FailureStage::Scrape,
                        message: format!("{e:#}"),
                    });
                    None
                }
                None => None,
            };
            units.push(EnrichedContentUnit::new(pin, article));
        }

        for unit in &mut units {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let outcome = self.pipeline.enrich(&unit.user_content, cancel).await;
            unit.user = record(&mut report, unit.pin_id, Facet::User, outcome);

            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            if let Some(url_content) = unit.url_content.as_deref() {
                let outcome = self.pipeline.enrich(url_content, cancel).await;
                unit.url_facet = Some(record(&mut report, unit.pin_id, Facet::Url, outcome));
            }
        }

        if cancel.is_cancelled() {
            report.cancelled = true;
            info!("Content harvest cancelled");
        }

        debug!(
            units = units.len(),
            failures = report.failures.len(),
            "Content harvest finished"
        );
        report.units = units;
        Ok(report)
    }
}

/// Move an outcome's failures into the report and return its enrichment.
fn record(
    report: &mut HarvestReport,
    pin_id: i64,
    facet: Facet,
    outcome: FacetOutcome,
) -> FacetEnrichment {
    if outcome.cancelled {
        report.cancelled = true;
    }
    if let Some(e) = outcome.local_error {
        warn!(pin_id, ?facet, "Local text analysis failed: {e}");
        report.failures.push(UnitFailure {
            pin_id,
            facet: Some(facet),
            stage: FailureStage::LocalAnalysis,
            message: e.to_string(),
        });
    }
    if let Some(e) = outcome.semantic_error {
        report.failures.push(UnitFailure {
            pin_id,
            facet: Some(facet),
            stage: FailureStage::SemanticAnalysis,
            message: e.to_string(),
        });
    }
    outcome.enrichment
}
