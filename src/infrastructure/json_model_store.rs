// Model parameter store backed by a JSON file
use crate::application::model_store::ModelParameterStore;
use crate::domain::error::ModelStoreError;
use crate::domain::parameter::Parameter;
use crate::domain::site_model::{normalize_site_id, site_key, ForecastRule, SiteModel};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

const LINEAR_REGRESSION: &str = "linear_regression";
const REPEAT_LAST: &str = "repeat_last";

/// One parameter entry as written by the training job
#[derive(Debug, Deserialize)]
struct RawRule {
    method: String,
    #[serde(default)]
    coef: Vec<f64>,
}

type RawModels = BTreeMap<String, BTreeMap<String, RawRule>>;

#[derive(Debug, Default)]
struct ModelTable {
    by_key: HashMap<String, Arc<SiteModel>>,
    site_ids: Vec<String>,
}

impl ModelTable {
    fn parse(path: &Path, contents: &str) -> Result<Self, ModelStoreError> {
        let raw: RawModels =
            serde_json::from_str(contents).map_err(|source| ModelStoreError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;

        let mut by_key = HashMap::with_capacity(raw.len());
        for (raw_site, raw_rules) in raw {
            let site_id = normalize_site_id(&raw_site);
            let mut model = SiteModel::new(site_id.clone());

            for (name, raw_rule) in raw_rules {
                let Some(parameter) = Parameter::from_name(&name) else {
                    tracing::debug!("Ignoring unknown parameter '{}' for site {}", name, site_id);
                    continue;
                };
                model = model.with_rule(parameter, parse_rule(&site_id, &name, &raw_rule)?);
            }

            if by_key.insert(site_key(&site_id), Arc::new(model)).is_some() {
                tracing::warn!("Duplicate model entry for site {}; keeping the last", site_id);
            }
        }

        let mut site_ids: Vec<String> = by_key.values().map(|m| m.site_id.clone()).collect();
        site_ids.sort();

        Ok(Self { by_key, site_ids })
    }
}

fn parse_rule(site_id: &str, parameter: &str, raw: &RawRule) -> Result<ForecastRule, ModelStoreError> {
    match raw.method.as_str() {
        LINEAR_REGRESSION => match raw.coef.as_slice() {
            [slope, intercept, ..] => Ok(ForecastRule::LinearRegression {
                slope: *slope,
                intercept: *intercept,
            }),
            _ => Err(ModelStoreError::InvalidRule {
                site_id: site_id.to_string(),
                parameter: parameter.to_string(),
                reason: format!("linear_regression needs 2 coefficients, got {}", raw.coef.len()),
            }),
        },
        REPEAT_LAST => Ok(ForecastRule::RepeatLast),
        other => Err(ModelStoreError::InvalidRule {
            site_id: site_id.to_string(),
            parameter: parameter.to_string(),
            reason: format!("unknown method '{}'", other),
        }),
    }
}

/// Reads the whole file up front. Lookups share the current table; a reload
/// builds a complete new table before replacing it.
pub struct JsonModelStore {
    path: PathBuf,
    table: RwLock<Arc<ModelTable>>,
}

impl JsonModelStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ModelStoreError> {
        let path = path.into();
        let table = Self::read_table(&path)?;
        tracing::info!(
            "Loaded models for {} sites from {}",
            table.site_ids.len(),
            path.display()
        );
        Ok(Self {
            path,
            table: RwLock::new(Arc::new(table)),
        })
    }

    fn read_table(path: &Path) -> Result<ModelTable, ModelStoreError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ModelStoreError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        ModelTable::parse(path, &contents)
    }

    fn current(&self) -> Arc<ModelTable> {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ModelParameterStore for JsonModelStore {
    fn load(&self, site_id: &str) -> Result<Option<Arc<SiteModel>>, ModelStoreError> {
        Ok(self.current().by_key.get(&site_key(site_id)).cloned())
    }

    fn site_ids(&self) -> Result<Vec<String>, ModelStoreError> {
        Ok(self.current().site_ids.clone())
    }

    fn reload(&self) -> Result<usize, ModelStoreError> {
        let table = Arc::new(Self::read_table(&self.path)?);
        let count = table.site_ids.len();
        *self.table.write().unwrap_or_else(PoisonError::into_inner) = table;
        Ok(count)
    }
}
