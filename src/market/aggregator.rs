use crate::error::AppError;
use crate::market::adapters::{CryptoTickerAdapter, SyntheticAdapter};
use crate::market::binance::{fetch_klines, SourceEndpoints};
use crate::market::catalog::{ETF_TABLE, FOREX_TABLE, FUTURES_TABLE, STOCKS_TABLE};
use crate::market::normalizer::normalize_quotes;
use crate::market::stream::{subscribe_trades, TradeSubscription};
use crate::market::types::{CandleData, CandleInterval, MarketAsset, MarketCategory};
use reqwest::Client;
use tracing::{debug, warn};

/// Uniform query surface over every category source plus the candle and
/// trade feeds used by the detail view.
#[derive(Debug, Clone)]
pub struct MarketDataService {
    http_client: Client,
    endpoints: SourceEndpoints,
}

impl MarketDataService {
    pub fn new(http_client: Client, endpoints: SourceEndpoints) -> Self {
        Self {
            http_client,
            endpoints,
        }
    }

    pub async fn fetch_market_data(&self, category: &str) -> Result<Vec<MarketAsset>, AppError> {
        let category = MarketCategory::parse_str(category)?;
        self.fetch_category(category).await
    }

    pub async fn fetch_category(
        &self,
        category: MarketCategory,
    ) -> Result<Vec<MarketAsset>, AppError> {
        let quotes = match category {
            MarketCategory::Crypto => {
                CryptoTickerAdapter::new(&self.http_client, &self.endpoints)
                    .fetch()
                    .await?
            }
            MarketCategory::Forex => SyntheticAdapter::new(&FOREX_TABLE).fetch().await?,
            MarketCategory::Stocks => SyntheticAdapter::new(&STOCKS_TABLE).fetch().await?,
            MarketCategory::Etf => SyntheticAdapter::new(&ETF_TABLE).fetch().await?,
            MarketCategory::Futures => SyntheticAdapter::new(&FUTURES_TABLE).fetch().await?,
        };

        debug!(category = category.as_str(), count = quotes.len(), "category quotes fetched");
        Ok(normalize_quotes(quotes, category))
    }

    /// Most recent `limit` candles. Any failure reads as "no data": the
    /// result is empty rather than an error.
    pub async fn fetch_candle_data(
        &self,
        symbol: &str,
        interval: CandleInterval,
        limit: u16,
    ) -> Vec<CandleData> {
        match fetch_klines(&self.http_client, &self.endpoints, symbol, interval, limit).await {
            Ok(candles) => candles,
            Err(error) => {
                warn!(
                    symbol,
                    interval = interval.as_str(),
                    %error,
                    "candle fetch failed, returning no data"
                );
                Vec::new()
            }
        }
    }

    pub async fn subscribe_trades(&self, symbol: &str) -> Result<TradeSubscription, AppError> {
        subscribe_trades(&self.endpoints, symbol).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_fake_exchange, unreachable_endpoints, FakeExchange};

    #[tokio::test]
    async fn unknown_category_is_rejected_before_any_io() {
        let service = MarketDataService::new(Client::new(), unreachable_endpoints());
        let result = service.fetch_market_data("Bogus").await;
        assert!(matches!(result, Err(AppError::UnknownCategory(tag)) if tag == "Bogus"));
    }

    #[tokio::test]
    async fn every_category_resolves_to_renderable_assets() {
        let exchange = spawn_fake_exchange(FakeExchange::default()).await;
        let service = MarketDataService::new(Client::new(), exchange.endpoints());

        for category in MarketCategory::ALL {
            let assets = service
                .fetch_market_data(category.as_str())
                .await
                .expect("category fetch should succeed");

            assert!(!assets.is_empty(), "{} returned no assets", category.as_str());
            for asset in &assets {
                assert_eq!(asset.category, category);
                assert!(asset.price.is_finite() && asset.price >= 0.0);
                assert!(asset.chart_data.len() >= 2);
                assert!(asset.price_formatted.starts_with('$'));
            }
        }
    }

    #[tokio::test]
    async fn crypto_assets_come_from_ticker_snapshot() {
        let exchange = spawn_fake_exchange(FakeExchange::default()).await;
        let service = MarketDataService::new(Client::new(), exchange.endpoints());

        let assets = service
            .fetch_category(MarketCategory::Crypto)
            .await
            .expect("crypto fetch should succeed");
        let bitcoin = assets
            .iter()
            .find(|asset| asset.id == "bitcoin")
            .expect("bitcoin should be present");

        assert_eq!(bitcoin.ticker, "BTC/USDT");
        assert_eq!(bitcoin.route, "BTC-USDT");
        assert_eq!(bitcoin.name, "Bitcoin");
        assert_eq!(bitcoin.price, 43_250.1);
        assert_eq!(bitcoin.change, 1_054.9);
        assert_eq!(bitcoin.change_percent, 2.5);
        assert_eq!(bitcoin.price_formatted, "$43,250.10");
        assert_eq!(bitcoin.chart_data.last().copied(), Some(43_250.1));
    }

    #[tokio::test]
    async fn crypto_transport_failure_is_reported() {
        let service = MarketDataService::new(Client::new(), unreachable_endpoints());
        let result = service.fetch_category(MarketCategory::Crypto).await;

        let error = result.expect_err("unreachable source must fail");
        assert!(matches!(error, AppError::CryptoFetch(_)));
        assert!(error.to_string().starts_with("Failed to fetch crypto data"));
    }

    #[tokio::test]
    async fn crypto_server_error_fails_whole_category() {
        let exchange = spawn_fake_exchange(FakeExchange {
            ticker_status: 500,
            ..FakeExchange::default()
        })
        .await;
        let service = MarketDataService::new(Client::new(), exchange.endpoints());

        assert!(matches!(
            service.fetch_category(MarketCategory::Crypto).await,
            Err(AppError::CryptoFetch(_))
        ));
    }

    #[tokio::test]
    async fn candle_transport_failure_resolves_empty() {
        let service = MarketDataService::new(Client::new(), unreachable_endpoints());
        let candles = service
            .fetch_candle_data("BTC/USDT", CandleInterval::D1, 30)
            .await;
        assert!(candles.is_empty());
    }

    #[tokio::test]
    async fn malformed_candle_payload_resolves_empty() {
        let exchange = spawn_fake_exchange(FakeExchange {
            klines_body: r#"{"code":-1121,"msg":"Invalid symbol."}"#.to_string(),
            ..FakeExchange::default()
        })
        .await;
        let service = MarketDataService::new(Client::new(), exchange.endpoints());

        let candles = service
            .fetch_candle_data("NOPE/USDT", CandleInterval::D1, 30)
            .await;
        assert!(candles.is_empty());
    }

    #[tokio::test]
    async fn candles_are_mapped_in_source_order() {
        let exchange = spawn_fake_exchange(FakeExchange::default()).await;
        let service = MarketDataService::new(Client::new(), exchange.endpoints());

        let candles = service
            .fetch_candle_data("BTC/USDT", CandleInterval::D1, 2)
            .await;

        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].time, 1_700_000_000);
        assert_eq!(candles[1].time, 1_700_086_400);
        assert!(candles.windows(2).all(|pair| pair[0].time < pair[1].time));
        assert_eq!(candles[1].open, 100.0);
        assert_eq!(candles[1].high, 105.0);
        assert_eq!(candles[1].low, 98.0);
        assert_eq!(candles[1].close, 102.0);
    }
}
