//! # Sales Owl
//!
//! `sales_owl_workspace` bundles the workspace crates behind one import:
//! [`math`] for the regression models and metrics, and [`forecast`] for the
//! monthly sales pipeline.
//!
//! ## Example
//!
//! ```
//! use sales_owl_workspace::forecast::heuristics::{confidence, CategoryForecast, Category};
//!
//! assert_eq!(confidence(1), 85);
//! assert_eq!(confidence(12), 60);
//!
//! let split = CategoryForecast::allocate(10000.0);
//! assert_eq!(split.get(Category::Women), 4200.0);
//! ```

pub use forecast_math as math;
pub use sales_forecast as forecast;

pub use sales_forecast::{
    train_from_csv, ForecastConfig, ForecastError, ForecastPoint, ForecastService, SalesForecast,
    Trend,
};

/// Forecast `months_ahead` months with the model and history named in `config`.
///
/// Falls back to the synthetic forecast when no model or history is available.
///
/// # Examples
///
/// ```
/// use sales_owl_workspace::{forecast_sales, ForecastConfig};
///
/// let config = ForecastConfig {
///     model_path: "does-not-exist.json".into(),
///     ..ForecastConfig::default()
/// };
/// let forecast = forecast_sales(config, Some(3)).unwrap();
/// assert_eq!(forecast.model_type, "Fallback");
/// assert_eq!(forecast.points.len(), 3);
/// ```
pub fn forecast_sales(
    config: ForecastConfig,
    months_ahead: Option<i64>,
) -> Result<SalesForecast, ForecastError> {
    ForecastService::open(config).predict_sales(months_ahead)
}
