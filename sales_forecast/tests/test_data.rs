use chrono::NaiveDate;
use sales_forecast::data::{parse_month, DataLoader};
use sales_forecast::ForecastError;
use std::io::Write;
use tempfile::NamedTempFile;

fn csv_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

#[test]
fn test_load_sorts_by_month() {
    let file = csv_file(&[
        "month,sales",
        "2023-03,2100.5",
        "2023-01,1800",
        "2023-02,1950.25",
    ]);

    let history = DataLoader::from_csv(file.path()).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history.sales(), vec![1800.0, 1950.25, 2100.5]);
    assert_eq!(
        history.first().unwrap().month,
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    );
    assert_eq!(
        history.last().unwrap().month,
        NaiveDate::from_ymd_opt(2023, 3, 1).unwrap()
    );
}

#[test]
fn test_column_detection() {
    let file = csv_file(&[
        "store,Total Sales,Order Date",
        "north,1200,2022/11/01",
        "north,1500,2022/12/01",
    ]);

    let history = DataLoader::from_csv(file.path()).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history.min_year().unwrap(), 2022);
}

#[test]
fn test_exact_headers_win_over_partial_matches() {
    let file = csv_file(&[
        "Sales Month,Month,Sales",
        "x,2023-01,1000",
        "x,2023-02,1100",
        "x,2023-03,1200",
    ]);

    let history = DataLoader::from_csv(file.path()).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history.sales(), vec![1000.0, 1100.0, 1200.0]);

    let upper = csv_file(&["notes,MONTH,SALES", "monthly sales,2023-01,50"]);
    let history = DataLoader::from_csv(upper.path()).unwrap();
    assert_eq!(history.sales(), vec![50.0]);
}

#[test]
fn test_missing_file() {
    let result = DataLoader::from_csv("no/such/sales_data.csv");
    assert!(matches!(result, Err(ForecastError::DataNotFound(_))));
}

#[test]
fn test_missing_sales_column() {
    let file = csv_file(&["month,revenue", "2023-01,100"]);
    assert!(matches!(
        DataLoader::from_csv(file.path()),
        Err(ForecastError::DataError(_))
    ));
}

#[test]
fn test_rejects_bad_rows() {
    let duplicate = csv_file(&["month,sales", "2023-01,100", "2023-01-15,120"]);
    assert!(matches!(
        DataLoader::from_csv(duplicate.path()),
        Err(ForecastError::DataError(_))
    ));

    let negative = csv_file(&["month,sales", "2023-01,-5"]);
    assert!(matches!(
        DataLoader::from_csv(negative.path()),
        Err(ForecastError::DataError(_))
    ));

    let garbage = csv_file(&["month,sales", "2023-01,lots"]);
    assert!(matches!(
        DataLoader::from_csv(garbage.path()),
        Err(ForecastError::DataError(_))
    ));
}

#[test]
fn test_header_only_is_empty() {
    let file = csv_file(&["month,sales"]);
    let history = DataLoader::from_csv(file.path()).unwrap();
    assert!(history.is_empty());
    assert!(matches!(history.min_year(), Err(ForecastError::EmptyHistory)));
}

#[test]
fn test_parse_month() {
    let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    assert_eq!(parse_month("2024-01").unwrap(), jan);
    assert_eq!(parse_month("2024/01").unwrap(), jan);
    assert_eq!(parse_month(" 2024-01-01 ").unwrap(), jan);
    assert!(parse_month("January 2024").is_err());
}
