// Repository trait for historical site chemistry
use crate::domain::reading::HistoricalReading;
use crate::domain::site::SiteLocation;
use async_trait::async_trait;

#[async_trait]
pub trait SiteHistoryRepository: Send + Sync {
    /// All readings for a site, oldest first. An empty vec means the site has
    /// no readings; an error means the store could not be asked.
    async fn history(&self, site_id: &str) -> anyhow::Result<Vec<HistoricalReading>>;

    /// Every site id with at least one reading
    async fn list_site_ids(&self) -> anyhow::Result<Vec<String>>;

    /// Every (site, nearest suburb) pair with at least one reading
    async fn list_site_locations(&self) -> anyhow::Result<Vec<SiteLocation>>;
}
