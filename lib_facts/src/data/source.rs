use async_trait::async_trait;

use crate::model::Fact;
use crate::retrieve::ErrorRecord;

/// A place facts can be loaded from and saved to.
///
/// Exactly two implementations exist: [`RemoteDataSource`](super::RemoteDataSource)
/// and [`CacheDataSource`](super::CacheDataSource). Neither re-classifies the
/// errors it passes on.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Loads up to `count` facts.
    async fn load(&self, count: u32) -> Result<Vec<Fact>, ErrorRecord>;

    /// Persists `facts` and returns them as confirmation.
    async fn save(&self, facts: Vec<Fact>) -> Result<Vec<Fact>, ErrorRecord>;
}
