// Monitoring site identity and location models
use serde::Serialize;
use std::fmt;

const SIMILAR_LIMIT: usize = 5;
const AVAILABLE_LIMIT: usize = 10;

/// A site and the suburb it is closest to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteLocation {
    pub site_id: String,
    pub nearest_suburb: String,
}

/// Number of monitoring sites in a suburb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuburbSummary {
    pub nearest_suburb: String,
    pub site_count: usize,
}

/// Site ids offered back to a caller who asked for an unknown site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteSuggestions {
    Similar(Vec<String>),
    Available(Vec<String>),
}

impl SiteSuggestions {
    /// Sites whose id contains `clean_id`, or failing that the first few known
    /// sites.
    pub fn from_known(clean_id: &str, known: &[String]) -> Self {
        let similar: Vec<String> = known
            .iter()
            .filter(|id| id.contains(clean_id))
            .take(SIMILAR_LIMIT)
            .cloned()
            .collect();

        if similar.is_empty() {
            SiteSuggestions::Available(known.iter().take(AVAILABLE_LIMIT).cloned().collect())
        } else {
            SiteSuggestions::Similar(similar)
        }
    }

    pub fn site_ids(&self) -> &[String] {
        match self {
            SiteSuggestions::Similar(ids) | SiteSuggestions::Available(ids) => ids,
        }
    }
}

impl fmt::Display for SiteSuggestions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (label, ids) = match self {
            SiteSuggestions::Similar(ids) => ("Similar sites", ids),
            SiteSuggestions::Available(ids) => ("Available sites", ids),
        };
        write!(f, "{}: [{}]", label, ids.join(", "))
    }
}
