use approx::assert_abs_diff_eq;
use chrono::{Datelike, Months};
use pretty_assertions::assert_eq;
use sales_forecast::config::ForecastConfig;
use sales_forecast::features::{build_history_features, ForecastAnchor};
use sales_forecast::{
    train_from_csv, DataLoader, ForecastError, ForecastService, ModelType, Season, Trend,
};
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Sales that rise by exactly 50 per month from 1050 in January 2021
fn write_linear_history(path: &Path, months: usize) {
    let mut csv = String::from("month,sales\n");
    for i in 0..months {
        let sales = 1000.0 + 50.0 * (i + 1) as f64;
        csv.push_str(&format!("{}-{:02},{}\n", 2021 + i / 12, i % 12 + 1, sales));
    }
    fs::write(path, csv).unwrap();
}

fn setup(months: usize) -> (TempDir, ForecastConfig) {
    let dir = tempdir().unwrap();
    let config = ForecastConfig {
        data_path: dir.path().join("sales_data.csv"),
        model_path: dir.path().join("sales_model.json"),
        ..ForecastConfig::default()
    };
    write_linear_history(&config.data_path, months);
    (dir, config)
}

#[test]
fn test_linear_history_selects_linear_model() {
    let (_dir, config) = setup(24);
    let report = train_from_csv(&config).unwrap();

    assert_eq!(report.model_type, ModelType::LinearRegression);
    assert!(report.linear_mae < report.forest_mae);
    assert!(config.model_path.exists());

    // January 2023 has month index 25: 1000 + 50 * 25 = 2250, Winter x1.2
    let first = &report.sample_forecast[0];
    assert_eq!(first.month, "Jan 2023");
    assert_eq!(first.season, Season::Winter);
    assert_abs_diff_eq!(first.predicted_sales, 2700.0, epsilon = 1.0);
}

#[test]
fn test_forecast_months_are_consecutive() {
    let (_dir, config) = setup(30);
    train_from_csv(&config).unwrap();

    let forecast = ForecastService::open(config.clone())
        .predict_sales(Some(24))
        .unwrap();
    assert_eq!(forecast.points.len(), 24);

    let history = DataLoader::from_csv(&config.data_path).unwrap();
    let last = history.last().unwrap().month;
    for (i, point) in forecast.points.iter().enumerate() {
        assert_eq!(point.date, last + Months::new(i as u32 + 1));
    }

    // The future month index keeps counting from the history
    let features = build_history_features(&history).unwrap();
    let anchor = ForecastAnchor::from_history(&history).unwrap();
    assert!(features
        .features
        .windows(2)
        .all(|w| w[1].month_index() > w[0].month_index()));
    let last_index = features.features.last().unwrap().month_index();
    assert_eq!(anchor.month_index, last_index);
    let indices: Vec<i64> = (1..=24)
        .map(|step| anchor.future_month(step).unwrap().features.month_index())
        .collect();
    assert!(indices.windows(2).all(|w| w[1] == w[0] + 1));
    assert_eq!(indices[0], last_index + 1);
}

#[test]
fn test_forecast_annotations() {
    let (_dir, config) = setup(24);
    train_from_csv(&config).unwrap();

    let points = ForecastService::open(config)
        .predict_sales(Some(12))
        .unwrap()
        .points;

    let confidences: Vec<u32> = points.iter().map(|p| p.confidence).collect();
    assert_eq!(confidences, vec![85, 80, 75, 70, 65, 60, 60, 60, 60, 60, 60, 60]);

    assert_eq!(points[0].trend, Trend::Growing);
    assert_eq!(points[1].trend, Trend::Growing);
    for point in &points[2..] {
        let expected = match point.season {
            Season::Winter | Season::Fall => Trend::Growing,
            Season::Spring => Trend::Stable,
            Season::Summer => Trend::Declining,
        };
        assert_eq!(point.trend, expected, "{}", point.month);
    }
    assert!(points.iter().all(|p| p.actual_sales == 0.0));
}

#[test]
fn test_training_is_reproducible() {
    let (_dir, config) = setup(24);
    let first = train_from_csv(&config).unwrap();
    let second = train_from_csv(&config).unwrap();

    assert_eq!(first.model_type, second.model_type);
    assert_eq!(first.linear_mae, second.linear_mae);
    assert_eq!(first.forest_mae, second.forest_mae);
    assert_eq!(first.sample_forecast, second.sample_forecast);
}

#[test]
fn test_repeated_requests_are_identical() {
    let (_dir, config) = setup(24);
    train_from_csv(&config).unwrap();
    let service = ForecastService::open(config);

    let first = service.predict_sales(Some(6)).unwrap();
    let second = service.predict_sales(Some(6)).unwrap();
    assert_eq!(first.points, second.points);
}

#[test]
fn test_fallback_without_model() {
    let (_dir, config) = setup(24);
    let forecast = ForecastService::open(config).predict_sales(Some(6)).unwrap();

    assert!(forecast.is_fallback());
    assert_eq!(forecast.points.len(), 6);
    let trends: Vec<Trend> = forecast.points.iter().map(|p| p.trend).collect();
    assert_eq!(
        trends,
        vec![
            Trend::Growing,
            Trend::Growing,
            Trend::Growing,
            Trend::Stable,
            Trend::Stable,
            Trend::Stable
        ]
    );
    assert!(forecast.points[0].actual_sales > 0.0);
    assert!(forecast.points[1..].iter().all(|p| p.actual_sales == 0.0));
}

#[test]
fn test_empty_history_is_an_error() {
    let (_dir, config) = setup(24);
    train_from_csv(&config).unwrap();
    fs::write(&config.data_path, "month,sales\n").unwrap();

    let result = ForecastService::open(config).predict_sales(None);
    assert!(matches!(result, Err(ForecastError::EmptyHistory)));
}

#[test]
fn test_horizon_is_clamped() {
    let (_dir, config) = setup(24);
    train_from_csv(&config).unwrap();
    let service = ForecastService::open(config);

    assert_eq!(service.predict_sales(None).unwrap().points.len(), 6);
    assert_eq!(service.predict_sales(Some(0)).unwrap().points.len(), 6);
    assert_eq!(service.predict_sales(Some(25)).unwrap().points.len(), 6);
    assert_eq!(service.predict_sales(Some(-1)).unwrap().points.len(), 6);
    assert_eq!(service.predict_sales(Some(1)).unwrap().points.len(), 1);
    assert_eq!(service.predict_sales(Some(24)).unwrap().points.len(), 24);
}

#[test]
fn test_export_summary_matches_points() {
    let (dir, config) = setup(24);
    train_from_csv(&config).unwrap();
    let service = ForecastService::open(config);

    let export = service
        .export_to_json(dir.path().join("export.json"), Some(3))
        .unwrap();
    let total: f64 = export
        .monthly_predictions
        .iter()
        .map(|p| p.predicted_sales)
        .sum();

    assert_eq!(export.model_type, "Linear Regression");
    assert_eq!(export.summary.total_months, 3);
    assert_abs_diff_eq!(export.summary.total_forecast, total, epsilon = 0.01);
    assert_abs_diff_eq!(export.summary.avg_monthly_sales, total / 3.0, epsilon = 0.01);
    assert_eq!(export.monthly_predictions[0].date.month(), 1);
    assert!(!export.category_forecast.is_empty());
}
