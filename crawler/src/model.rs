use serde::{Deserialize, Serialize};

/// One review as returned by the `appreviews` collection endpoint.
///
/// Only the fields the pipeline consumes are modeled; everything else in the
/// response object is ignored on deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReview {
    pub recommendationid: String,
    pub author: ReviewAuthor,
    /// Seconds since epoch. The collection also carries `timestamp_updated`;
    /// the creation timestamp is the one that is normalized.
    pub timestamp_created: i64,
    #[serde(default)]
    pub review: String,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub votes_up: u64,
    #[serde(default)]
    pub votes_funny: u64,
    #[serde(default)]
    pub voted_up: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewAuthor {
    pub steamid: String,
    /// Minutes on record when the review was written, not lifetime playtime.
    #[serde(default)]
    pub playtime_at_review: u64,
}

/// One page of the paginated collection.
#[derive(Debug, Clone)]
pub struct ReviewPage {
    pub reviews: Vec<RawReview>,
    /// Continuation token for the next request, forwarded verbatim.
    pub cursor: String,
    /// Collection-wide review count; the endpoint reports it on the first
    /// page and the stream uses it to decide termination.
    pub total: Option<u64>,
}

/// The persisted review schema.
///
/// `id`, `author` and `date` are derived; every other field is a pass-through
/// copy of the raw record or a caller-supplied label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedReview {
    pub id: String,
    pub author: String,
    pub date: String,
    pub hours: u64,
    pub content: String,
    pub comments: u64,
    pub source: String,
    pub helpful: u64,
    pub funny: u64,
    pub recommended: bool,
    pub franchise: String,
    #[serde(rename = "gameName")]
    pub game_name: String,
}

/// Caller-supplied labels stamped onto every normalized review.
#[derive(Debug, Clone)]
pub struct GameLabels {
    pub game: String,
    pub franchise: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Records pulled out of the remote collection.
    pub reviews_fetched: u64,
    /// Records that passed the date window.
    pub reviews_admitted: u64,
    pub batches_written: u64,
}
