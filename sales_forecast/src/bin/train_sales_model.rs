use sales_forecast::{train_from_csv, ForecastConfig, ForecastService};
use std::env;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Optional path to a JSON config; defaults otherwise
    let config = match env::args().nth(1) {
        Some(path) => ForecastConfig::from_json_file(path)?,
        None => ForecastConfig::default(),
    };

    println!("Sales Model Training");
    println!("====================");
    println!("Data:  {}", config.data_path.display());
    println!("Model: {}", config.model_path.display());
    println!();

    let report = train_from_csv(&config)?;
    println!("{}", report);

    let service = ForecastService::open(config);
    let categories = service.predict_categories()?;
    println!("{}", categories);

    let info = service.model_info();
    println!(
        "Serving {} from {} (loaded: {}, API {})",
        info.model_type,
        service.config().model_path.display(),
        info.model_loaded,
        info.api_version
    );

    Ok(())
}
