use goalboard::{router, AppState, CsvFileSource, DashboardConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = DashboardConfig::from_env()?;
    let source = Arc::new(CsvFileSource::new(config.data_path.clone()));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!(
        "goal period weeks {}..={} of {}, goal {}",
        config.period.start_week, config.period.end_week, config.period.year,
        config.period.goal_amount
    );

    let app = router(AppState::new(config, source));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
