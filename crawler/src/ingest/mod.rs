pub mod steam;

use crate::model::ReviewPage;
use async_trait::async_trait;
use crawler_core::Result;

/// Start-of-collection sentinel cursor.
pub const START_CURSOR: &str = "*";

#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Fetch one page of reviews, continuing from the given cursor.
    async fn fetch_page(&self, cursor: &str) -> Result<ReviewPage>;

    /// Get the source identifier
    fn source_id(&self) -> &str;

    /// Check if the source is reachable
    async fn health_check(&self) -> Result<()>;
}

pub use steam::SteamSource;
