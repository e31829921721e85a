use chrono::{Local, LocalResult, TimeZone};
use uuid::Uuid;

use crate::model::{GameLabels, NormalizedReview, RawReview};
use crawler_core::{Error, Result};

/// Constant source tag stamped onto every normalized review.
pub const SOURCE_TAG: &str = "steam";

/// Deterministic identifier for an opaque upstream id.
///
/// UUIDv5 over the DNS namespace, rendered as 32 lowercase hex digits. The
/// same input yields the same identifier across runs and processes.
pub fn derive_id(input: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, input.as_bytes())
        .simple()
        .to_string()
}

/// Calendar date (`YYYY-MM-DD`, local timezone) of an epoch-second timestamp.
pub fn date_of(timestamp: i64) -> Result<String> {
    let date = match Local.timestamp_opt(timestamp, 0) {
        LocalResult::Single(dt) => dt.date_naive(),
        LocalResult::Ambiguous(dt, _) => dt.date_naive(),
        LocalResult::None => {
            return Err(Error::Validation(format!(
                "timestamp {timestamp} is not representable in the local timezone"
            )))
        }
    };
    Ok(date.format("%Y-%m-%d").to_string())
}

/// Map one raw review onto the persisted schema.
pub fn normalize(raw: &RawReview, labels: &GameLabels) -> Result<NormalizedReview> {
    Ok(NormalizedReview {
        id: derive_id(&raw.recommendationid),
        author: derive_id(&raw.author.steamid),
        date: date_of(raw.timestamp_created)?,
        hours: raw.author.playtime_at_review,
        content: raw.review.clone(),
        comments: raw.comment_count,
        source: SOURCE_TAG.to_string(),
        helpful: raw.votes_up,
        funny: raw.votes_funny,
        recommended: raw.voted_up,
        franchise: labels.franchise.clone(),
        game_name: labels.game.clone(),
    })
}
