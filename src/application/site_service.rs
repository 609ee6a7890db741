// Site service - Use cases for browsing monitoring sites and suburbs
use crate::application::site_history_repository::SiteHistoryRepository;
use crate::domain::site::{SiteLocation, SuburbSummary};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteEntry {
    pub site_id: String,
    pub original_id: String,
}

/// The first `limit` items of a longer list, with the full count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub total: usize,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    fn first(items: Vec<T>, limit: usize) -> Self {
        let total = items.len();
        Self {
            total,
            items: items.into_iter().take(limit).collect(),
        }
    }
}

#[derive(Clone)]
pub struct SiteService {
    repository: Arc<dyn SiteHistoryRepository>,
    listing_limit: usize,
}

impl SiteService {
    pub fn new(repository: Arc<dyn SiteHistoryRepository>, listing_limit: usize) -> Self {
        Self {
            repository,
            listing_limit,
        }
    }

    pub async fn list_sites(&self) -> anyhow::Result<Page<SiteEntry>> {
        let ids: BTreeSet<String> = self.repository.list_site_ids().await?.into_iter().collect();
        let entries = ids
            .into_iter()
            .map(|original_id| SiteEntry {
                site_id: original_id.trim().to_string(),
                original_id,
            })
            .collect();
        Ok(Page::first(entries, self.listing_limit))
    }

    /// Suburbs by number of sites, busiest first.
    pub async fn list_suburbs(&self) -> anyhow::Result<Page<SuburbSummary>> {
        let locations = self.repository.list_site_locations().await?;

        let mut counts: HashMap<String, BTreeSet<String>> = HashMap::new();
        for location in locations {
            if location.nearest_suburb.trim().is_empty() {
                continue;
            }
            counts
                .entry(location.nearest_suburb)
                .or_default()
                .insert(location.site_id);
        }

        let mut suburbs: Vec<SuburbSummary> = counts
            .into_iter()
            .map(|(nearest_suburb, sites)| SuburbSummary {
                nearest_suburb,
                site_count: sites.len(),
            })
            .collect();
        suburbs.sort_by(|a, b| {
            b.site_count
                .cmp(&a.site_count)
                .then_with(|| a.nearest_suburb.cmp(&b.nearest_suburb))
        });

        Ok(Page::first(suburbs, self.listing_limit))
    }

    /// Sites whose suburb contains `suburb_name`, ignoring case.
    pub async fn search_by_suburb(&self, suburb_name: &str) -> anyhow::Result<Vec<SiteLocation>> {
        let needle = suburb_name.trim().to_lowercase();
        let mut matches: Vec<SiteLocation> = self
            .repository
            .list_site_locations()
            .await?
            .into_iter()
            .filter(|l| l.nearest_suburb.to_lowercase().contains(&needle))
            .collect();

        matches.sort_by(|a, b| {
            a.nearest_suburb
                .cmp(&b.nearest_suburb)
                .then_with(|| a.site_id.cmp(&b.site_id))
        });
        matches.dedup();

        tracing::debug!("Suburb search '{}' matched {} sites", suburb_name, matches.len());
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reading::HistoricalReading;
    use async_trait::async_trait;

    struct FakeLocations(Vec<SiteLocation>);

    #[async_trait]
    impl SiteHistoryRepository for FakeLocations {
        async fn history(&self, _site_id: &str) -> anyhow::Result<Vec<HistoricalReading>> {
            Ok(Vec::new())
        }

        async fn list_site_ids(&self) -> anyhow::Result<Vec<String>> {
            Ok(self.0.iter().map(|l| l.site_id.clone()).collect())
        }

        async fn list_site_locations(&self) -> anyhow::Result<Vec<SiteLocation>> {
            Ok(self.0.clone())
        }
    }

    fn location(site_id: &str, suburb: &str) -> SiteLocation {
        SiteLocation {
            site_id: site_id.to_string(),
            nearest_suburb: suburb.to_string(),
        }
    }

    fn service(limit: usize) -> SiteService {
        SiteService::new(
            Arc::new(FakeLocations(vec![
                location("233217", "Melbourne"),
                location("233218", "Melbourne"),
                location("406201", "Bendigo"),
                location(" 405209", "North Melbourne"),
                location("230100", ""),
            ])),
            limit,
        )
    }

    #[tokio::test]
    async fn test_list_sites_trims_and_caps() {
        let page = service(2).list_sites().await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(
            page.items[0],
            SiteEntry {
                site_id: "405209".into(),
                original_id: " 405209".into()
            }
        );
    }

    #[tokio::test]
    async fn test_list_suburbs_orders_by_site_count() {
        let page = service(50).list_suburbs().await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items[0].nearest_suburb, "Melbourne");
        assert_eq!(page.items[0].site_count, 2);
        assert_eq!(page.items[1].nearest_suburb, "Bendigo");
        assert_eq!(page.items[2].nearest_suburb, "North Melbourne");
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let matches = service(50).search_by_suburb("melb").await.unwrap();
        let ids: Vec<&str> = matches.iter().map(|l| l.site_id.as_str()).collect();
        assert_eq!(ids, vec!["233217", "233218", " 405209"]);
    }

    #[tokio::test]
    async fn test_search_without_matches_is_empty() {
        assert!(service(50).search_by_suburb("Perth").await.unwrap().is_empty());
    }
}
