//! Content harvesting for boards: comment text per pin, and pin content
//! enriched with scraped articles and semantic analysis.

mod article;
mod comments;
mod content;

pub use article::{extract_article, ArticleScraper, HttpArticleScraper, ScrapedArticle};
pub use comments::{harvest_board_text, CommentBundle};
pub use content::{
    ContentHarvester, EnrichedContentUnit, Facet, FailureStage, HarvestReport, UnitFailure,
};
