// Store trait for per-site forecasting models
use crate::domain::error::ModelStoreError;
use crate::domain::site_model::SiteModel;
use std::sync::Arc;

pub trait ModelParameterStore: Send + Sync {
    /// Model for a site. The id may carry stray whitespace, quotes or a
    /// different case; `Ok(None)` means the site has no model.
    fn load(&self, site_id: &str) -> Result<Option<Arc<SiteModel>>, ModelStoreError>;

    /// Clean ids of every site with a model, sorted.
    fn site_ids(&self) -> Result<Vec<String>, ModelStoreError>;

    /// Re-reads the backing store and swaps in the new models in one step.
    /// Returns the number of sites now loaded.
    fn reload(&self) -> Result<usize, ModelStoreError>;
}
