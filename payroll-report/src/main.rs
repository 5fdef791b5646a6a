use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payroll_report::ReportConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "payroll_report=info,payroll_service=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ReportConfig::from_env();
    tracing::info!("Starting payroll report v{}", config.version);
    tracing::info!("Reading dataset from {}", config.dataset_path.display());

    let report = payroll_report::run(&config).await?;
    print!("{}", report);

    Ok(())
}
