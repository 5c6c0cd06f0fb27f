//! # Sales Forecast
//!
//! A Rust library for forecasting monthly retail sales.
//!
//! ## Features
//!
//! - Monthly sales history loading from CSV
//! - Time features: month index, month of year, quarter and season one-hot
//! - Model selection between linear regression and a seeded random forest
//! - Seasonally adjusted forecasts with trend labels and decaying confidence
//! - Category allocation of a monthly total
//! - A synthetic fallback forecast when no trained model can answer
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sales_forecast::config::ForecastConfig;
//! use sales_forecast::service::{train_from_csv, ForecastService};
//!
//! let config = ForecastConfig::default();
//!
//! // Train and persist the better of the two candidates
//! let report = train_from_csv(&config)?;
//! println!("{}", report);
//!
//! // Forecast the next six months
//! let service = ForecastService::open(config);
//! let forecast = service.predict_sales(Some(6))?;
//! for point in &forecast.points {
//!     println!("{}", point);
//! }
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

pub mod calendar;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod fallback;
pub mod features;
pub mod forecast;
pub mod heuristics;
pub mod models;
pub mod service;
pub mod trainer;

// Re-export commonly used types
pub use crate::calendar::Season;
pub use crate::config::ForecastConfig;
pub use crate::data::{DataLoader, SalesHistory};
pub use crate::error::{ForecastError, Result};
pub use crate::export::{ForecastExport, ForecastSummary};
pub use crate::forecast::{ForecastGenerator, ForecastPoint, Predictor};
pub use crate::heuristics::{Category, CategoryForecast, Trend};
pub use crate::models::{ModelArtifact, ModelType, TrainedModel};
pub use crate::service::{train_from_csv, ForecastService, SalesForecast, TrainingReport};
pub use crate::trainer::{ModelTrainer, TrainingOutcome};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
