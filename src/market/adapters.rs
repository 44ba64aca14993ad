use crate::error::AppError;
use crate::market::binance::{fetch_ticker_24h, SourceEndpoints};
use crate::market::catalog::{
    crypto_icon_url, crypto_listing, flag_url, SyntheticInstrument, CRYPTO_WATCHLIST,
};
use crate::market::sparkline::generate_series;
use crate::market::types::{CryptoTicker, CurrencyFlags, RawQuote};
use rand::Rng;
use reqwest::Client;
use tracing::{debug, warn};

/// Live crypto quotes from one 24h ticker snapshot of the watchlist.
pub struct CryptoTickerAdapter<'a> {
    client: &'a Client,
    endpoints: &'a SourceEndpoints,
}

impl<'a> CryptoTickerAdapter<'a> {
    pub fn new(client: &'a Client, endpoints: &'a SourceEndpoints) -> Self {
        Self { client, endpoints }
    }

    pub async fn fetch(&self) -> Result<Vec<RawQuote>, AppError> {
        let symbols: Vec<&str> = CRYPTO_WATCHLIST
            .iter()
            .map(|listing| listing.symbol)
            .collect();

        let tickers = match fetch_ticker_24h(self.client, self.endpoints, &symbols).await {
            Ok(tickers) => tickers,
            Err(error) => {
                warn!(%error, "crypto ticker snapshot failed");
                return Err(AppError::CryptoFetch(error.to_string()));
            }
        };
        debug!(count = tickers.len(), "crypto ticker snapshot received");

        Ok(quotes_from_tickers(tickers, &mut rand::thread_rng()))
    }
}

pub fn quotes_from_tickers<R>(tickers: Vec<CryptoTicker>, rng: &mut R) -> Vec<RawQuote>
where
    R: Rng + ?Sized,
{
    tickers
        .into_iter()
        .map(|ticker| {
            let listing = crypto_listing(&ticker.symbol);
            let display_ticker = match ticker.symbol.strip_suffix("USDT") {
                Some(base) => format!("{base}/USDT"),
                None => ticker.symbol.clone(),
            };

            RawQuote {
                id: listing
                    .map(|listing| listing.id.to_string())
                    .unwrap_or_else(|| ticker.symbol.to_ascii_lowercase()),
                ticker: display_ticker,
                name: listing.map(|listing| listing.name.to_string()),
                price: ticker.price,
                change: ticker.change,
                change_percent: ticker.change_percent,
                chart_data: generate_series(rng, ticker.price, ticker.change_percent),
                icon: listing.map(crypto_icon_url),
                flags: None,
            }
        })
        .collect()
}

/// Simulated quotes drawn around a static table of base prices. Every call
/// draws a fresh perturbation per instrument.
pub struct SyntheticAdapter {
    table: &'static [SyntheticInstrument],
}

impl SyntheticAdapter {
    pub fn new(table: &'static [SyntheticInstrument]) -> Self {
        Self { table }
    }

    pub async fn fetch(&self) -> Result<Vec<RawQuote>, AppError> {
        Ok(self.sample(&mut rand::thread_rng()))
    }

    pub fn sample<R>(&self, rng: &mut R) -> Vec<RawQuote>
    where
        R: Rng + ?Sized,
    {
        self.table
            .iter()
            .map(|instrument| synthesize_quote(instrument, rng))
            .collect()
    }
}

pub fn synthesize_quote<R>(instrument: &SyntheticInstrument, rng: &mut R) -> RawQuote
where
    R: Rng + ?Sized,
{
    let change_percent = (rng.gen::<f64>() - 0.5) * instrument.volatility * 100.0;
    let price = instrument.base_price * (1.0 + change_percent / 100.0);
    let change = price - instrument.base_price;

    RawQuote {
        id: instrument.id.to_string(),
        ticker: instrument.ticker.to_string(),
        name: Some(instrument.name.to_string()),
        price,
        change,
        change_percent,
        chart_data: generate_series(rng, price, change_percent),
        icon: None,
        flags: instrument.pair.map(|(base, quote)| CurrencyFlags {
            base: flag_url(base),
            quote: flag_url(quote),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::catalog::{ETF_TABLE, FOREX_TABLE, FUTURES_TABLE, STOCKS_TABLE};
    use crate::market::sparkline::SPARKLINE_POINTS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn synthetic_quotes_stay_within_half_volatility() {
        let mut rng = StdRng::seed_from_u64(42);
        let tables: [&'static [SyntheticInstrument]; 4] =
            [&FOREX_TABLE, &STOCKS_TABLE, &ETF_TABLE, &FUTURES_TABLE];

        for table in tables {
            let adapter = SyntheticAdapter::new(table);
            for _ in 0..200 {
                for (quote, instrument) in adapter.sample(&mut rng).iter().zip(table.iter()) {
                    let bound = instrument.volatility * 50.0;
                    assert!(quote.change_percent >= -bound && quote.change_percent <= bound);
                    assert_eq!(
                        quote.price,
                        instrument.base_price * (1.0 + quote.change_percent / 100.0)
                    );
                    assert_eq!(quote.change, quote.price - instrument.base_price);
                    assert_eq!(quote.chart_data.len(), SPARKLINE_POINTS);
                    assert_eq!(quote.chart_data[SPARKLINE_POINTS - 1], quote.price);
                }
            }
        }
    }

    #[test]
    fn forex_quotes_carry_flags() {
        let mut rng = StdRng::seed_from_u64(1);
        let quotes = SyntheticAdapter::new(&FOREX_TABLE).sample(&mut rng);

        let eurusd = quotes
            .iter()
            .find(|quote| quote.id == "eurusd")
            .expect("eurusd is in the forex table");
        let flags = eurusd.flags.as_ref().expect("forex quotes have flags");
        assert!(flags.base.ends_with("/eu.png"));
        assert!(flags.quote.ends_with("/us.png"));
    }

    #[tokio::test]
    async fn repeated_forex_fetches_disagree_within_bounds() {
        let adapter = SyntheticAdapter::new(&FOREX_TABLE);
        let first = adapter.fetch().await.expect("synthetic fetch cannot fail");
        let second = adapter.fetch().await.expect("synthetic fetch cannot fail");

        let differing = first
            .iter()
            .zip(second.iter())
            .filter(|(left, right)| left.change_percent != right.change_percent)
            .count();
        assert!(differing > 0);

        for (quote, instrument) in first.iter().chain(second.iter()).zip(
            FOREX_TABLE.iter().chain(FOREX_TABLE.iter()),
        ) {
            assert!(quote.change_percent.abs() <= instrument.volatility * 50.0);
        }
    }

    #[test]
    fn maps_watchlist_tickers_to_quotes() {
        let mut rng = StdRng::seed_from_u64(9);
        let tickers = vec![
            CryptoTicker {
                symbol: "BTCUSDT".to_string(),
                price: 43_250.1,
                change_percent: 2.5,
                change: 1_054.9,
            },
            CryptoTicker {
                symbol: "PEPEUSDT".to_string(),
                price: 0.0000123,
                change_percent: -4.0,
                change: -0.0000005,
            },
        ];
        let quotes = quotes_from_tickers(tickers, &mut rng);

        assert_eq!(quotes[0].id, "bitcoin");
        assert_eq!(quotes[0].ticker, "BTC/USDT");
        assert_eq!(quotes[0].name.as_deref(), Some("Bitcoin"));
        assert!(quotes[0].icon.is_some());
        assert_eq!(quotes[0].chart_data[SPARKLINE_POINTS - 1], 43_250.1);

        assert_eq!(quotes[1].id, "pepeusdt");
        assert_eq!(quotes[1].ticker, "PEPE/USDT");
        assert_eq!(quotes[1].name, None);
        assert_eq!(quotes[1].icon, None);
    }
}
