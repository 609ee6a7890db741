// Prediction service - Use case for forecasting a site's water quality
use crate::application::model_store::ModelParameterStore;
use crate::application::site_history_repository::SiteHistoryRepository;
use crate::domain::error::{ModelStoreError, PredictionError};
use crate::domain::forecast::predict_all;
use crate::domain::prediction::PredictionResult;
use crate::domain::recommendation::recommend;
use crate::domain::risk::classify;
use crate::domain::site::SiteSuggestions;
use crate::domain::site_model::normalize_site_id;
use crate::domain::wqi::{round_score, score};
use chrono::{Days, Local, NaiveDate};
use serde::Serialize;
use std::sync::Arc;

pub const DEFAULT_HORIZON_DAYS: u64 = 30;

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub model_loaded: bool,
    pub database_connected: bool,
    pub total_sites_in_model: usize,
    pub total_sites_in_db: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct PredictionService {
    models: Arc<dyn ModelParameterStore>,
    history: Arc<dyn SiteHistoryRepository>,
    horizon_days: u64,
}

impl PredictionService {
    pub fn new(
        models: Arc<dyn ModelParameterStore>,
        history: Arc<dyn SiteHistoryRepository>,
        horizon_days: u64,
    ) -> Self {
        Self {
            models,
            history,
            horizon_days,
        }
    }

    pub async fn predict_for_site(&self, site_id: &str) -> Result<PredictionResult, PredictionError> {
        self.predict_for_site_on(site_id, Local::now().date_naive()).await
    }

    /// Prediction as if run on `today`; the result is dated `horizon_days`
    /// later.
    pub async fn predict_for_site_on(
        &self,
        site_id: &str,
        today: NaiveDate,
    ) -> Result<PredictionResult, PredictionError> {
        let clean_id = normalize_site_id(site_id);

        let Some(model) = self.models.load(&clean_id)? else {
            let suggestions = self.suggest_sites(&clean_id).await;
            tracing::warn!(
                "No model for site '{}', offering {} alternatives",
                clean_id,
                suggestions.site_ids().len()
            );
            return Err(PredictionError::SiteNotFound {
                site_id: site_id.to_string(),
                suggestions,
            });
        };

        let history = self
            .history
            .history(&model.site_id)
            .await
            .map_err(PredictionError::DataSource)?;

        if history.is_empty() {
            tracing::warn!("Site '{}' has a model but no readings", model.site_id);
            return Err(PredictionError::NoHistoricalData {
                site_id: site_id.to_string(),
            });
        }

        tracing::debug!("Forecasting site {} from {} readings", model.site_id, history.len());

        let parameters = predict_all(&model, &history);
        let wqi_score = round_score(score(&parameters));
        let risk_level = classify(wqi_score);
        let recommendations = recommend(risk_level, &parameters);
        let prediction_date = today
            .checked_add_days(Days::new(self.horizon_days))
            .unwrap_or(today);

        tracing::info!(
            "Predicted site {}: wqi={:.2} risk={}",
            model.site_id,
            wqi_score,
            risk_level
        );

        Ok(PredictionResult {
            site_id: model.site_id.clone(),
            prediction_date,
            parameters,
            wqi_score,
            risk_level,
            recommendations,
        })
    }

    /// Swaps in a freshly read model store.
    pub fn reload_models(&self) -> Result<usize, ModelStoreError> {
        let count = self.models.reload()?;
        tracing::info!("Reloaded models for {} sites", count);
        Ok(count)
    }

    pub async fn health(&self) -> HealthReport {
        let model_sites = self.models.site_ids();
        let db_sites = self.history.list_site_ids().await;

        let error = match (&model_sites, &db_sites) {
            (Err(e), _) => Some(e.to_string()),
            (_, Err(e)) => Some(e.to_string()),
            _ => None,
        };

        HealthReport {
            status: if error.is_none() { "healthy" } else { "unhealthy" },
            model_loaded: model_sites.is_ok(),
            database_connected: db_sites.is_ok(),
            total_sites_in_model: model_sites.map(|s| s.len()).unwrap_or(0),
            total_sites_in_db: db_sites.map(|s| s.len()).unwrap_or(0),
            error,
        }
    }

    /// Known sites to offer instead of an unknown one. Prefers the history
    /// store's list and falls back to the model store's.
    async fn suggest_sites(&self, clean_id: &str) -> SiteSuggestions {
        let known = match self.history.list_site_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!("Could not list sites from history store: {}", e);
                self.models.site_ids().unwrap_or_default()
            }
        };

        SiteSuggestions::from_known(clean_id, &known)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parameter::Parameter;
    use crate::domain::reading::HistoricalReading;
    use crate::domain::recommendation::{PH_ADVICE, SALINITY_ADVICE};
    use crate::domain::risk::RiskLevel;
    use crate::domain::site::SiteLocation;
    use crate::domain::site_model::{site_key, ForecastRule, SiteModel};
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::HashMap;

    struct FakeModels {
        models: HashMap<String, Arc<SiteModel>>,
        broken: bool,
    }

    impl FakeModels {
        fn new(models: Vec<SiteModel>) -> Self {
            let models = models
                .into_iter()
                .map(|m| (site_key(&m.site_id), Arc::new(m)))
                .collect();
            Self { models, broken: false }
        }

        fn broken() -> Self {
            Self {
                models: HashMap::new(),
                broken: true,
            }
        }

        fn failure(&self) -> ModelStoreError {
            ModelStoreError::Unreadable {
                path: "model/site_model_params_1Month.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            }
        }
    }

    impl ModelParameterStore for FakeModels {
        fn load(&self, site_id: &str) -> Result<Option<Arc<SiteModel>>, ModelStoreError> {
            if self.broken {
                return Err(self.failure());
            }
            Ok(self.models.get(&site_key(site_id)).cloned())
        }

        fn site_ids(&self) -> Result<Vec<String>, ModelStoreError> {
            if self.broken {
                return Err(self.failure());
            }
            let mut ids: Vec<String> = self.models.values().map(|m| m.site_id.clone()).collect();
            ids.sort();
            Ok(ids)
        }

        fn reload(&self) -> Result<usize, ModelStoreError> {
            self.site_ids().map(|ids| ids.len())
        }
    }

    #[derive(Default)]
    struct FakeHistory {
        readings: HashMap<String, Vec<HistoricalReading>>,
        sites: Vec<String>,
        unreachable: bool,
    }

    #[async_trait]
    impl SiteHistoryRepository for FakeHistory {
        async fn history(&self, site_id: &str) -> anyhow::Result<Vec<HistoricalReading>> {
            if self.unreachable {
                anyhow::bail!("connection refused");
            }
            Ok(self.readings.get(site_id).cloned().unwrap_or_default())
        }

        async fn list_site_ids(&self) -> anyhow::Result<Vec<String>> {
            if self.unreachable {
                anyhow::bail!("connection refused");
            }
            Ok(self.sites.clone())
        }

        async fn list_site_locations(&self) -> anyhow::Result<Vec<SiteLocation>> {
            Ok(Vec::new())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn monthly(rows: Vec<Vec<(Parameter, f64)>>) -> Vec<HistoricalReading> {
        let start = Utc.with_ymd_and_hms(2023, 10, 1, 0, 0, 0).unwrap();
        rows.into_iter()
            .enumerate()
            .map(|(i, values)| {
                values.into_iter().fold(
                    HistoricalReading::new(start + Duration::days(30 * i as i64)),
                    |r, (p, v)| r.with(p, v),
                )
            })
            .collect()
    }

    fn service(models: FakeModels, history: FakeHistory) -> PredictionService {
        PredictionService::new(Arc::new(models), Arc::new(history), DEFAULT_HORIZON_DAYS)
    }

    fn ph_only_site() -> (FakeModels, FakeHistory) {
        let models = FakeModels::new(vec![
            SiteModel::new("site_001").with_rule(Parameter::Ph, ForecastRule::RepeatLast),
        ]);
        let mut history = FakeHistory::default();
        history.readings.insert(
            "site_001".to_string(),
            monthly(vec![
                vec![(Parameter::Ph, 7.2)],
                vec![(Parameter::Ph, 7.3)],
                vec![(Parameter::Ph, 7.4)],
            ]),
        );
        history.sites = vec!["site_001".to_string()];
        (models, history)
    }

    #[tokio::test]
    async fn test_predicts_from_repeat_last_ph() {
        let (models, history) = ph_only_site();
        let result = service(models, history)
            .predict_for_site_on("site_001", today())
            .await
            .unwrap();

        assert_eq!(result.site_id, "site_001");
        assert_eq!(result.prediction_date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(result.parameters.get(Parameter::Ph), 7.4);
        for p in Parameter::ALL.into_iter().filter(|p| *p != Parameter::Ph) {
            assert_eq!(result.parameters.get(p), 0.0);
        }
        // Every ceiling parameter at 0.0 is perfect, pH is in band.
        assert_eq!(result.wqi_score, 100.0);
        assert_eq!(result.risk_level, classify(result.wqi_score));
        assert_eq!(result.risk_level, RiskLevel::Safe);
        assert_eq!(result.recommendations.len(), 3);
    }

    #[tokio::test]
    async fn test_site_id_formatting_is_ignored() {
        let (models, history) = ph_only_site();
        let service = service(models, history);
        for raw in [" \"site_001", "\"SITE_001\"", "  site_001  "] {
            let result = service.predict_for_site_on(raw, today()).await.unwrap();
            assert_eq!(result.site_id, "site_001");
        }
    }

    #[tokio::test]
    async fn test_mixed_rules() {
        let models = FakeModels::new(vec![
            SiteModel::new("site_002")
                .with_rule(
                    Parameter::Chloride,
                    ForecastRule::LinearRegression { slope: 0.1, intercept: 10.0 },
                )
                .with_rule(Parameter::Calcium, ForecastRule::RepeatLast)
                .with_rule(
                    Parameter::Salinity,
                    ForecastRule::LinearRegression { slope: 200.0, intercept: 0.0 },
                )
                .with_rule(Parameter::Ph, ForecastRule::RepeatLast),
        ]);
        let mut history = FakeHistory::default();
        history.readings.insert(
            "site_002".to_string(),
            monthly(vec![
                vec![(Parameter::Chloride, 15.0), (Parameter::Calcium, 45.0), (Parameter::Ph, 6.0)],
                vec![(Parameter::Chloride, 16.0), (Parameter::Calcium, 46.0)],
                vec![(Parameter::Chloride, 17.0), (Parameter::Calcium, 47.0)],
            ]),
        );

        let result = service(models, history)
            .predict_for_site_on("site_002", today())
            .await
            .unwrap();

        assert!((result.parameters.get(Parameter::Chloride) - 10.3).abs() < 1e-9);
        assert_eq!(result.parameters.get(Parameter::Calcium), 47.0);
        assert_eq!(result.parameters.get(Parameter::Salinity), 600.0);
        assert_eq!(result.parameters.get(Parameter::Ph), 6.0);
        assert!((0.0..=100.0).contains(&result.wqi_score));
        assert_eq!(result.risk_level, classify(result.wqi_score));
        assert!(result.recommendations.contains(&PH_ADVICE.to_string()));
        assert!(result.recommendations.contains(&SALINITY_ADVICE.to_string()));
    }

    #[tokio::test]
    async fn test_unknown_site_suggests_known_sites() {
        let (models, mut history) = ph_only_site();
        history.sites = vec!["site_001".into(), "site_002".into(), "bore_7".into()];

        let err = service(models, history)
            .predict_for_site_on("site_09", today())
            .await
            .unwrap_err();

        match err {
            PredictionError::SiteNotFound { site_id, suggestions } => {
                assert_eq!(site_id, "site_09");
                assert_eq!(suggestions, SiteSuggestions::Available(vec![
                    "site_001".into(),
                    "site_002".into(),
                    "bore_7".into(),
                ]));
            }
            other => panic!("expected SiteNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_site_falls_back_to_model_ids() {
        let (models, mut history) = ph_only_site();
        history.unreachable = true;

        let err = service(models, history)
            .predict_for_site_on("site_0", today())
            .await
            .unwrap_err();

        match err {
            PredictionError::SiteNotFound { suggestions, .. } => {
                assert_eq!(suggestions, SiteSuggestions::Similar(vec!["site_001".into()]));
            }
            other => panic!("expected SiteNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_known_site_without_history() {
        let (models, mut history) = ph_only_site();
        history.readings.clear();

        let err = service(models, history)
            .predict_for_site_on("site_001", today())
            .await
            .unwrap_err();

        assert!(matches!(err, PredictionError::NoHistoricalData { .. }));
        assert_eq!(err.to_string(), "No historical data found for site 'site_001'");
    }

    #[tokio::test]
    async fn test_unreachable_history_is_a_data_source_error() {
        let (models, mut history) = ph_only_site();
        history.unreachable = true;

        let err = service(models, history)
            .predict_for_site_on("site_001", today())
            .await
            .unwrap_err();

        assert!(matches!(err, PredictionError::DataSource(_)));
    }

    #[tokio::test]
    async fn test_broken_model_store_is_a_configuration_error() {
        let (_, history) = ph_only_site();

        let err = service(FakeModels::broken(), history)
            .predict_for_site_on("site_001", today())
            .await
            .unwrap_err();

        assert!(matches!(err, PredictionError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_health_reports_counts() {
        let (models, history) = ph_only_site();
        let report = service(models, history).health().await;

        assert_eq!(report.status, "healthy");
        assert!(report.model_loaded && report.database_connected);
        assert_eq!(report.total_sites_in_model, 1);
        assert_eq!(report.total_sites_in_db, 1);
        assert!(report.error.is_none());
    }

    #[tokio::test]
    async fn test_health_reports_unreachable_history() {
        let (models, mut history) = ph_only_site();
        history.unreachable = true;
        let report = service(models, history).health().await;

        assert_eq!(report.status, "unhealthy");
        assert!(report.model_loaded);
        assert!(!report.database_connected);
        assert_eq!(report.error.as_deref(), Some("connection refused"));
    }
}
