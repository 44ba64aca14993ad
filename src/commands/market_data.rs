use crate::error::AppError;
use crate::market::board::CategorySnapshot;
use crate::market::now_unix_ms;
use crate::market::types::{CandleData, CandleQueryArgs, MarketAsset, MarketCategory};
use crate::state::AppState;
use futures_util::future::join_all;
use tracing::{info, warn};

async fn refresh_slot(state: &AppState, category: MarketCategory) -> CategorySnapshot {
    state.board.write().begin_fetch(category);

    let result = state.market_data.fetch_category(category).await;
    match &result {
        Ok(assets) => info!(
            category = category.as_str(),
            count = assets.len(),
            "category refreshed"
        ),
        Err(error) => warn!(category = category.as_str(), %error, "category refresh failed"),
    }

    let mut board = state.board.write();
    CategorySnapshot::from(board.complete(category, result, now_unix_ms()))
}

pub async fn refresh_category(
    state: &AppState,
    category: &str,
) -> Result<CategorySnapshot, AppError> {
    let category = MarketCategory::parse_str(category)?;
    Ok(refresh_slot(state, category).await)
}

/// Every category is fetched concurrently; one failing source does not hold
/// back the others.
pub async fn refresh_all_categories(state: &AppState) -> Vec<CategorySnapshot> {
    join_all(
        MarketCategory::ALL
            .into_iter()
            .map(|category| refresh_slot(state, category)),
    )
    .await
}

pub fn category_snapshot(state: &AppState, category: &str) -> Result<CategorySnapshot, AppError> {
    let category = MarketCategory::parse_str(category)?;
    let board = state.board.read();
    board
        .slot(category)
        .map(CategorySnapshot::from)
        .ok_or_else(|| AppError::UnknownCategory(category.as_str().to_string()))
}

pub fn search_assets(state: &AppState, term: &str) -> Vec<MarketAsset> {
    state.board.read().search(term)
}

pub async fn market_candles(
    state: &AppState,
    args: CandleQueryArgs,
) -> Result<Vec<CandleData>, AppError> {
    let query = args.normalize()?;
    Ok(state
        .market_data
        .fetch_candle_data(&query.symbol, query.interval, query.limit)
        .await)
}
