//! Comment text per pin, with local topic and keyword analysis.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::db::{get_comment_bodies_on_pins, get_pin_ids_on_board};
use crate::text::{analyze, strip_markup, TextAnalysis, TextConfig};

/// The plain-text comments on one pin and their analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentBundle {
    pub comments: Vec<String>,
    /// `None` when the comments held nothing analyzable.
    pub analysis: Option<TextAnalysis>,
}

/// Analyze the live comments on each live pin of a board.
///
/// Pins without live comments are left out of the map.
///
/// # Errors
///
/// Returns an error if a query fails. Analysis failures are logged and leave
/// that pin's `analysis` empty.
pub async fn harvest_board_text(
    pool: &SqlitePool,
    board_id: i64,
    text: &TextConfig,
) -> Result<BTreeMap<i64, CommentBundle>> {
    let pins = get_pin_ids_on_board(pool, board_id).await?;
    let pin_ids: Vec<i64> = pins.iter().map(|pin| pin.id).collect();
    let bodies = get_comment_bodies_on_pins(pool, &pin_ids).await?;

    let mut comments_by_pin: BTreeMap<i64, Vec<String>> = BTreeMap::new();
    for row in bodies {
        comments_by_pin
            .entry(row.pin_id)
            .or_default()
            .push(strip_markup(&row.body));
    }

    let bundles: BTreeMap<i64, CommentBundle> = comments_by_pin
        .into_iter()
        .map(|(pin_id, comments)| {
            let analysis = match analyze(&comments.join("\n"), text) {
                Ok(analysis) => Some(analysis),
                Err(e) => {
                    warn!(pin_id, "Comment analysis failed: {e}");
                    None
                }
            };
            (pin_id, CommentBundle { comments, analysis })
        })
        .collect();

    debug!(
        board_id,
        pins = pins.len(),
        pins_with_comments = bundles.len(),
        "Harvested board comment text"
    );

    Ok(bundles)
}
