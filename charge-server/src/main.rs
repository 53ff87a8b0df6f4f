use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use charge_server::config::AppConfig;
use charge_server::ocm::{Backend, CachedStationSource, MockStationSource, OcmClient};
use charge_server::pipeline::StationFinder;
use charge_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "charge_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    // Mock data if configured, otherwise the live API
    let backend = match &config.mock_dir {
        Some(dir) => {
            let mock = MockStationSource::new(dir)?;
            info!(
                dir = %dir.display(),
                regions = ?mock.available_regions(),
                "serving mock station data"
            );
            Backend::Mock(mock)
        }
        None => Backend::Live(OcmClient::new(config.ocm_config())?),
    };

    let source = CachedStationSource::new(backend, &config.cache_config());
    let state = AppState::new(StationFinder::new(source), &config.default_region);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        addr = %config.bind_addr,
        region = %config.default_region,
        "charging station finder listening"
    );
    info!("API endpoints:");
    info!("  GET /health        - Health check");
    info!("  GET /api/stations  - Filtered stations around lat/lon");
    info!("  GET /api/nearest   - Nearest station to lat/lon");
    info!("  GET /api/cities    - Cities with stations");

    axum::serve(listener, app).await?;
    Ok(())
}
