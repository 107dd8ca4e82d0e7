//! Unified timeline of the pins, comments and votes on a board.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

use crate::db::{
    get_comment_ids_on_pins, get_comment_votes_on_pins, get_pin_ids_on_board,
    get_pin_votes_on_pins, CommentRef, CommentVoteFilter, CommentVoteRef, PinRef, PinVoteRef,
};

/// One interaction on a board, tagged by kind.
///
/// Serializes as the originating row's columns plus a `type` field, and a
/// `subtype` field for votes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interaction {
    Pin(PinRef),
    Comment(CommentRef),
    Vote(Vote),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "subtype", rename_all = "snake_case")]
pub enum Vote {
    PinVote(PinVoteRef),
    CommentVote(CommentVoteRef),
}

impl Interaction {
    /// Id of the originating row.
    #[must_use]
    pub fn id(&self) -> i64 {
        match self {
            Self::Pin(pin) => pin.id,
            Self::Comment(comment) => comment.id,
            Self::Vote(Vote::PinVote(vote)) => vote.id,
            Self::Vote(Vote::CommentVote(vote)) => vote.id,
        }
    }

    /// User who made the interaction.
    #[must_use]
    pub fn user_id(&self) -> i64 {
        match self {
            Self::Pin(pin) => pin.user_id,
            Self::Comment(comment) => comment.user_id,
            Self::Vote(Vote::PinVote(vote)) => vote.user_id,
            Self::Vote(Vote::CommentVote(vote)) => vote.user_id,
        }
    }
}

/// Every interaction on a board: comments, then pin votes, then comment
/// votes, then the pins themselves.
///
/// Each category keeps its query order; nothing is deduplicated.
///
/// # Errors
///
/// Returns an error if any underlying query fails.
pub async fn collect_interactions(
    pool: &SqlitePool,
    board_id: i64,
    comment_votes: CommentVoteFilter,
) -> Result<Vec<Interaction>> {
    let pins = get_pin_ids_on_board(pool, board_id).await?;
    let pin_ids: Vec<i64> = pins.iter().map(|pin| pin.id).collect();

    let (comments, pin_votes, comment_vote_rows) = tokio::try_join!(
        get_comment_ids_on_pins(pool, &pin_ids),
        get_pin_votes_on_pins(pool, &pin_ids),
        get_comment_votes_on_pins(pool, &pin_ids, comment_votes),
    )?;

    debug!(
        board_id,
        pins = pins.len(),
        comments = comments.len(),
        pin_votes = pin_votes.len(),
        comment_votes = comment_vote_rows.len(),
        "Collected board interactions"
    );

    Ok(concat_interactions(comments, pin_votes, comment_vote_rows, pins))
}

fn concat_interactions(
    comments: Vec<CommentRef>,
    pin_votes: Vec<PinVoteRef>,
    comment_votes: Vec<CommentVoteRef>,
    pins: Vec<PinRef>,
) -> Vec<Interaction> {
    let mut together =
        Vec::with_capacity(comments.len() + pin_votes.len() + comment_votes.len() + pins.len());
    together.extend(comments.into_iter().map(Interaction::Comment));
    together.extend(
        pin_votes
            .into_iter()
            .map(|vote| Interaction::Vote(Vote::PinVote(vote))),
    );
    together.extend(
        comment_votes
            .into_iter()
            .map(|vote| Interaction::Vote(Vote::CommentVote(vote))),
    );
    together.extend(pins.into_iter().map(Interaction::Pin));
    together
}
