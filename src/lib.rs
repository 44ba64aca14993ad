pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod lending;
pub mod market;
pub mod state;

#[cfg(test)]
mod test_support;

use commands::{
    app_info::app_info,
    borrow::loan_quote,
    health::health,
    kyc::kyc_status_get,
    market_data::refresh_all_categories,
    market_detail::{detail_snapshot, start_detail_session, stop_detail_session},
};
use config::AppArgs;
use db::initialize_pool;
use error::AppError;
use market::aggregator::MarketDataService;
use market::types::DetailSessionArgs;
use reqwest::Client;
use state::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn run() -> Result<(), AppError> {
    init_tracing();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_host())
}

async fn run_host() -> Result<(), AppError> {
    let config = AppArgs::from_env().normalize()?;
    let build = app_info();
    info!(
        name = build.product_name,
        version = build.version,
        platform = build.platform,
        arch = build.arch,
        db_path = %config.db_path().display(),
        "starting"
    );

    let db_pool = initialize_pool(&config).await?;
    let market_data = MarketDataService::new(Client::new(), config.endpoints.clone());
    let state = AppState::new(db_pool, market_data);

    for snapshot in refresh_all_categories(&state).await {
        let top = snapshot
            .featured
            .iter()
            .map(|asset| format!("{} {}", asset.ticker, asset.price_formatted))
            .collect::<Vec<_>>()
            .join(", ");
        info!(
            category = snapshot.category.as_str(),
            assets = snapshot.assets.len(),
            error = ?snapshot.error,
            featured = %top,
            "category ready"
        );
    }

    let kyc_status = kyc_status_get(&state).await?;
    let quote = loan_quote(None)?;
    info!(
        kyc_status = kyc_status.as_str(),
        daily_rate = %quote.daily_rate_formatted,
        "borrowing terms"
    );

    let report = health(&state).await;
    info!(
        db = report.db,
        loaded_categories = report.loaded_categories,
        "health"
    );

    let Some(detail) = config.detail else {
        return Ok(());
    };

    let session = start_detail_session(
        &state,
        DetailSessionArgs {
            symbol: detail.symbol,
            interval: Some(detail.interval),
            limit: Some(detail.limit),
            poll_interval_ms: Some(detail.poll_interval_ms),
        },
    )
    .await?;
    info!(
        symbol = %session.symbol,
        interval = session.interval.as_str(),
        "detail session running, press ctrl-c to stop"
    );

    tokio::signal::ctrl_c().await?;

    let view = detail_snapshot(&state);
    info!(
        symbol = %view.symbol,
        candles = view.candles.len(),
        price = ?view.display.map(|display| display.price),
        "detail session final state"
    );
    stop_detail_session(&state).await?;
    Ok(())
}
