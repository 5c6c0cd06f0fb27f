//! Forecast service boundary
//!
//! The service owns the currently loaded model as an immutable
//! `Arc<ModelArtifact>` handle. Reloading builds a fresh artifact and swaps
//! the handle; a model is never changed in place, so any number of callers
//! can forecast concurrently from the handle they cloned.
//!
//! Every request is answered with some forecast. A missing model, a missing
//! history file or any other failure on the model path switches to the
//! fallback forecast. The one exception is an empty history, which is
//! reported to the caller because there is no month to forecast from.

use crate::config::ForecastConfig;
use crate::data::DataLoader;
use crate::error::{ForecastError, Result};
use crate::export::ForecastExport;
use crate::fallback::FallbackPredictor;
use crate::forecast::{month_label, ForecastGenerator, ForecastPoint};
use crate::heuristics::CategoryForecast;
use crate::models::{ModelArtifact, ModelType};
use crate::trainer::ModelTrainer;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

/// Version reported by [`ForecastService::model_info`]
pub const API_VERSION: &str = "1.0.0";

/// Model label reported when the fallback forecast answered
pub const FALLBACK_LABEL: &str = "Fallback";

/// Months forecast right after training, as a sanity check of the new model
const SAMPLE_FORECAST_MONTHS: usize = 6;

/// Answer to a sales forecast request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesForecast {
    pub points: Vec<ForecastPoint>,
    /// Label of the model that produced the points, or "Fallback"
    pub model_type: String,
    pub generated_at: DateTime<Utc>,
}

impl SalesForecast {
    /// Whether the points came from the fallback predictor
    pub fn is_fallback(&self) -> bool {
        self.model_type == FALLBACK_LABEL
    }
}

/// Status of the loaded model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub model_loaded: bool,
    /// Training time of the loaded model (ISO-8601)
    pub last_updated: Option<String>,
    pub api_version: String,
}

/// Forecasting entry point with fallback handling
#[derive(Debug)]
pub struct ForecastService {
    config: ForecastConfig,
    model: RwLock<Option<Arc<ModelArtifact>>>,
    fallback: FallbackPredictor,
}

impl ForecastService {
    /// Create a service without a model; requests use the fallback until a reload
    pub fn new(config: ForecastConfig) -> Self {
        Self {
            fallback: FallbackPredictor::new(config.fallback.clone()),
            config,
            model: RwLock::new(None),
        }
    }

    /// Create a service around an already loaded model
    pub fn with_model(config: ForecastConfig, artifact: Arc<ModelArtifact>) -> Self {
        let service = Self::new(config);
        service.swap_model(Some(artifact));
        service
    }

    /// Create a service and try to load the model at `config.model_path`
    pub fn open(config: ForecastConfig) -> Self {
        let service = Self::new(config);
        if let Err(e) = service.reload_model() {
            warn!(error = %e, "could not load model, using fallback predictions");
        }
        service
    }

    /// Get the configuration
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Handle to the currently loaded model, if any
    pub fn current_model(&self) -> Option<Arc<ModelArtifact>> {
        self.model.read().clone()
    }

    fn swap_model(&self, artifact: Option<Arc<ModelArtifact>>) {
        *self.model.write() = artifact;
    }

    /// Load the model artifact from disk and swap it in.
    ///
    /// A missing artifact clears the handle so requests use the fallback.
    /// Any other failure keeps the previous model and is returned.
    pub fn reload_model(&self) -> Result<Option<ModelType>> {
        match ModelArtifact::load(&self.config.model_path) {
            Ok(artifact) => {
                let model_type = artifact.model_type;
                self.swap_model(Some(Arc::new(artifact)));
                info!(model_type = %model_type, "model loaded");
                Ok(Some(model_type))
            }
            Err(ForecastError::DataNotFound(path)) => {
                self.swap_model(None);
                warn!(path = %path, "model file not found, using fallback predictions");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Forecast sales for the requested number of months.
    ///
    /// `months_ahead` outside 1..=max (or absent) uses the default horizon.
    pub fn predict_sales(&self, months_ahead: Option<i64>) -> Result<SalesForecast> {
        let months = self.config.months_ahead(months_ahead);
        let generated_at = Utc::now();

        let Some(artifact) = self.current_model() else {
            return Ok(self.fallback_forecast(months, generated_at));
        };

        match self.model_forecast(&artifact, months) {
            Ok(points) => Ok(SalesForecast {
                points,
                model_type: artifact.model_type.label().to_string(),
                generated_at,
            }),
            Err(e) if e.is_fallback_eligible() => {
                warn!(error = %e, "model forecast failed, using fallback predictions");
                Ok(self.fallback_forecast(months, generated_at))
            }
            Err(e) => Err(e),
        }
    }

    /// Forecast from the loaded model and the history on disk
    fn model_forecast(&self, artifact: &ModelArtifact, months: usize) -> Result<Vec<ForecastPoint>> {
        let history = DataLoader::from_csv(&self.config.data_path)?;
        ForecastGenerator::new(&artifact.model).forecast(&history, months)
    }

    fn fallback_forecast(&self, months: usize, generated_at: DateTime<Utc>) -> SalesForecast {
        info!(months, "generating fallback forecast");
        SalesForecast {
            points: self.fallback.predict(months, generated_at.date_naive()),
            model_type: FALLBACK_LABEL.to_string(),
            generated_at,
        }
    }

    /// Split next month's forecast across product categories
    pub fn predict_categories(&self) -> Result<CategoryForecast> {
        let forecast = self.predict_sales(Some(1))?;
        Ok(forecast
            .points
            .first()
            .map(|p| CategoryForecast::allocate(p.predicted_sales))
            .unwrap_or_default())
    }

    /// Describe the loaded model
    pub fn model_info(&self) -> ModelInfo {
        let model = self.current_model();
        ModelInfo {
            model_type: model
                .as_ref()
                .map_or(FALLBACK_LABEL, |m| m.model_type.label())
                .to_string(),
            model_loaded: model.is_some(),
            last_updated: model.as_ref().map(|m| m.timestamp_iso()),
            api_version: API_VERSION.to_string(),
        }
    }

    /// Build a complete export record
    pub fn export(&self, months_ahead: Option<i64>) -> Result<ForecastExport> {
        let forecast = self.predict_sales(months_ahead)?;
        let categories = self.predict_categories()?;

        Ok(ForecastExport::new(
            forecast.model_type,
            forecast.points,
            categories,
            forecast.generated_at,
        ))
    }

    /// Build an export record and write it as JSON
    pub fn export_to_json<P: AsRef<Path>>(
        &self,
        path: P,
        months_ahead: Option<i64>,
    ) -> Result<ForecastExport> {
        let export = self.export(months_ahead)?;
        export.write_json(path)?;
        Ok(export)
    }
}

/// Summary of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub model_type: ModelType,
    pub linear_mae: f64,
    pub forest_mae: f64,
    /// Number of monthly records trained on
    pub records: usize,
    pub first_month: NaiveDate,
    pub last_month: NaiveDate,
    /// Forecast produced by the freshly trained model
    pub sample_forecast: Vec<ForecastPoint>,
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Trained on {} months ({} to {})",
            self.records,
            month_label(self.first_month),
            month_label(self.last_month)
        )?;
        writeln!(f, "  Linear Regression MAE: {:.2}", self.linear_mae)?;
        writeln!(f, "  Random Forest MAE:     {:.2}", self.forest_mae)?;
        writeln!(f, "  Best Model: {}", self.model_type)?;
        writeln!(f, "Sample Forecast:")?;
        for point in &self.sample_forecast {
            writeln!(f, "  {}", point)?;
        }
        Ok(())
    }
}

/// Train on the history at `config.data_path` and save the winner to `config.model_path`
pub fn train_from_csv(config: &ForecastConfig) -> Result<TrainingReport> {
    config.validate()?;

    let history = DataLoader::from_csv(&config.data_path)?;
    let (first_month, last_month) = match (history.first(), history.last()) {
        (Some(first), Some(last)) => (first.month, last.month),
        _ => return Err(ForecastError::EmptyHistory),
    };
    info!(
        records = history.len(),
        path = %config.data_path.display(),
        "loaded sales history"
    );

    let outcome = ModelTrainer::new(config.trainer.clone()).train_history(&history)?;
    let artifact = ModelArtifact::new(outcome.model);
    artifact.save(&config.model_path)?;

    let sample_forecast =
        ForecastGenerator::new(&artifact.model).forecast(&history, SAMPLE_FORECAST_MONTHS)?;

    Ok(TrainingReport {
        model_type: outcome.model_type,
        linear_mae: outcome.linear_mae,
        forest_mae: outcome.forest_mae,
        records: history.len(),
        first_month,
        last_month,
        sample_forecast,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::Category;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn write_history(path: &Path, months: usize) {
        let mut csv = String::from("month,sales\n");
        for i in 0..months {
            let year = 2021 + (i / 12) as i32;
            let month = i % 12 + 1;
            let sales = 2000.0 + 25.0 * i as f64 + if month == 12 { 600.0 } else { 0.0 };
            csv.push_str(&format!("{}-{:02},{}\n", year, month, sales));
        }
        fs::write(path, csv).unwrap();
    }

    fn workspace(months: usize) -> (TempDir, ForecastConfig) {
        let dir = tempdir().unwrap();
        let config = ForecastConfig {
            data_path: dir.path().join("sales_data.csv"),
            model_path: dir.path().join("sales_model.json"),
            trainer: crate::config::TrainerConfig {
                n_estimators: 10,
                ..Default::default()
            },
            ..ForecastConfig::default()
        };
        write_history(&config.data_path, months);
        (dir, config)
    }

    #[test]
    fn test_train_then_forecast() {
        let (_dir, config) = workspace(24);
        let report = train_from_csv(&config).unwrap();
        assert_eq!(report.records, 24);
        assert_eq!(report.sample_forecast.len(), 6);
        assert_eq!(report.sample_forecast[0].month, "Jan 2023");

        let service = ForecastService::open(config);
        let forecast = service.predict_sales(Some(3)).unwrap();
        assert!(!forecast.is_fallback());
        assert_eq!(forecast.model_type, report.model_type.label());
        assert_eq!(forecast.points.len(), 3);
        assert_eq!(forecast.points, report.sample_forecast[..3].to_vec());

        let info = service.model_info();
        assert!(info.model_loaded);
        assert_eq!(info.api_version, "1.0.0");
        assert!(info.last_updated.is_some());
    }

    #[test]
    fn test_missing_model_uses_fallback() {
        let (_dir, config) = workspace(24);
        let service = ForecastService::open(config);

        let forecast = service.predict_sales(None).unwrap();
        assert!(forecast.is_fallback());
        assert_eq!(forecast.points.len(), 6);
        assert!(forecast.points[0].actual_sales > 0.0);

        let info = service.model_info();
        assert!(!info.model_loaded);
        assert_eq!(info.model_type, "Fallback");
        assert_eq!(info.last_updated, None);
    }

    #[test]
    fn test_missing_history_uses_fallback() {
        let (_dir, config) = workspace(24);
        train_from_csv(&config).unwrap();
        fs::remove_file(&config.data_path).unwrap();

        let service = ForecastService::open(config);
        assert!(service.current_model().is_some());
        let forecast = service.predict_sales(Some(2)).unwrap();
        assert!(forecast.is_fallback());
        assert_eq!(forecast.points.len(), 2);
    }

    #[test]
    fn test_unparseable_history_uses_fallback() {
        let (_dir, config) = workspace(24);
        train_from_csv(&config).unwrap();
        fs::write(&config.data_path, "month,sales\n2023-01,lots\n").unwrap();

        let service = ForecastService::open(config);
        assert!(service.current_model().is_some());
        let forecast = service.predict_sales(Some(3)).unwrap();
        assert!(forecast.is_fallback());
        assert_eq!(forecast.points.len(), 3);
    }

    #[test]
    fn test_corrupt_artifact_at_open_uses_fallback() {
        let (_dir, config) = workspace(24);
        fs::write(&config.model_path, "not a model").unwrap();

        let service = ForecastService::open(config);
        assert!(service.current_model().is_none());
        assert!(!service.model_info().model_loaded);
        assert!(service.predict_sales(None).unwrap().is_fallback());
    }

    #[test]
    fn test_corrupt_artifact_at_reload_keeps_model() {
        let (_dir, config) = workspace(24);
        let report = train_from_csv(&config).unwrap();
        let service = ForecastService::open(config.clone());
        let before = service.current_model().unwrap();

        fs::write(&config.model_path, "{").unwrap();
        assert!(matches!(
            service.reload_model(),
            Err(ForecastError::SerializationError(_))
        ));

        let after = service.current_model().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(after.model_type, report.model_type);
        assert!(!service.predict_sales(Some(2)).unwrap().is_fallback());
    }

    #[test]
    fn test_empty_history_is_surfaced() {
        let (_dir, config) = workspace(24);
        train_from_csv(&config).unwrap();
        fs::write(&config.data_path, "month,sales\n").unwrap();

        let service = ForecastService::open(config);
        assert!(matches!(
            service.predict_sales(Some(2)),
            Err(ForecastError::EmptyHistory)
        ));
    }

    #[test]
    fn test_reload_swaps_model() {
        let (_dir, config) = workspace(24);
        let service = ForecastService::open(config.clone());
        assert!(service.current_model().is_none());

        train_from_csv(&config).unwrap();
        let loaded = service.reload_model().unwrap();
        assert!(loaded.is_some());
        assert!(service.current_model().is_some());

        fs::remove_file(&config.model_path).unwrap();
        assert_eq!(service.reload_model().unwrap(), None);
        assert!(service.current_model().is_none());
    }

    #[test]
    fn test_categories_from_first_point() {
        let (_dir, config) = workspace(24);
        let service = ForecastService::open(config);

        let first = service.predict_sales(Some(1)).unwrap().points[0].predicted_sales;
        let categories = service.predict_categories().unwrap();
        assert_eq!(categories, CategoryForecast::allocate(first));
        assert!(categories.get(Category::Women) > categories.get(Category::Men));
    }

    #[test]
    fn test_export_to_json() {
        let (dir, config) = workspace(24);
        let service = ForecastService::open(config);
        let path = dir.path().join("forecast.json");

        let export = service.export_to_json(&path, Some(4)).unwrap();
        assert_eq!(export.summary.total_months, 4);
        assert_eq!(export.model_type, "Fallback");

        let written: ForecastExport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.summary, export.summary);
        assert_eq!(written.monthly_predictions.len(), 4);
    }

    #[test]
    fn test_train_empty_history() {
        let (_dir, config) = workspace(0);
        assert!(matches!(
            train_from_csv(&config),
            Err(ForecastError::EmptyHistory)
        ));
    }
}
