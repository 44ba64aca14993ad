//! Static instrument tables: the crypto watchlist and the simulated
//! forex/stocks/ETF/futures books.

#[derive(Debug, Clone, Copy)]
pub struct CryptoListing {
    pub symbol: &'static str,
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct SyntheticInstrument {
    pub id: &'static str,
    pub ticker: &'static str,
    pub name: &'static str,
    pub base_price: f64,
    pub volatility: f64,
    /// Base/quote currency codes, forex only.
    pub pair: Option<(&'static str, &'static str)>,
}

const COINGECKO_IMAGES: &str = "https://assets.coingecko.com/coins/images";
const FLAG_CDN_BASE_URL: &str = "https://flagcdn.com/w40";

pub static CRYPTO_WATCHLIST: [CryptoListing; 15] = [
    crypto("BTCUSDT", "bitcoin", "Bitcoin", "1/small/bitcoin.png"),
    crypto("ETHUSDT", "ethereum", "Ethereum", "279/small/ethereum.png"),
    crypto("BNBUSDT", "bnb", "BNB", "825/small/bnb-icon2_2x.png"),
    crypto("XRPUSDT", "xrp", "XRP", "44/small/xrp-symbol-white-128.png"),
    crypto("SOLUSDT", "solana", "Solana", "4128/small/solana.png"),
    crypto("ADAUSDT", "cardano", "Cardano", "975/small/cardano.png"),
    crypto("DOGEUSDT", "dogecoin", "Dogecoin", "5/small/dogecoin.png"),
    crypto("DOTUSDT", "polkadot", "Polkadot", "12171/small/polkadot.png"),
    crypto("MATICUSDT", "polygon", "Polygon", "4713/small/matic-token-icon.png"),
    crypto("LTCUSDT", "litecoin", "Litecoin", "2/small/litecoin.png"),
    crypto("AVAXUSDT", "avalanche", "Avalanche", "12559/small/Avalanche_Circle_RedWhite_Trans.png"),
    crypto("LINKUSDT", "chainlink", "Chainlink", "877/small/chainlink-new-logo.png"),
    crypto("UNIUSDT", "uniswap", "Uniswap", "12504/small/uniswap-uni.png"),
    crypto("ATOMUSDT", "cosmos", "Cosmos", "1481/small/cosmos_hub.png"),
    crypto("XLMUSDT", "stellar", "Stellar", "100/small/Stellar_symbol_black_RGB.png"),
];

pub static FOREX_TABLE: [SyntheticInstrument; 8] = [
    forex("eurusd", "EUR/USD", 1.0850, 0.003, "EUR", "USD"),
    forex("gbpusd", "GBP/USD", 1.2950, 0.004, "GBP", "USD"),
    forex("usdjpy", "USD/JPY", 149.50, 0.003, "USD", "JPY"),
    forex("usdchf", "USD/CHF", 0.8750, 0.003, "USD", "CHF"),
    forex("audusd", "AUD/USD", 0.6550, 0.004, "AUD", "USD"),
    forex("usdcad", "USD/CAD", 1.3450, 0.003, "USD", "CAD"),
    forex("nzdusd", "NZD/USD", 0.6150, 0.004, "NZD", "USD"),
    forex("eurgbp", "EUR/GBP", 0.8380, 0.003, "EUR", "GBP"),
];

pub static STOCKS_TABLE: [SyntheticInstrument; 10] = [
    listed("aapl", "AAPL", "Apple Inc", 250.00, 0.02),
    listed("msft", "MSFT", "Microsoft", 440.00, 0.018),
    listed("googl", "GOOGL", "Alphabet", 180.00, 0.022),
    listed("amzn", "AMZN", "Amazon", 225.00, 0.025),
    listed("tsla", "TSLA", "Tesla", 420.00, 0.04),
    listed("meta", "META", "Meta Platforms", 590.00, 0.025),
    listed("nvda", "NVDA", "NVIDIA", 130.00, 0.035),
    listed("jpm", "JPM", "JPMorgan Chase", 240.00, 0.015),
    listed("v", "V", "Visa Inc", 315.00, 0.015),
    listed("wmt", "WMT", "Walmart", 92.00, 0.012),
];

pub static ETF_TABLE: [SyntheticInstrument; 8] = [
    listed("spy", "SPY", "SPDR S&P 500", 595.00, 0.012),
    listed("qqq", "QQQ", "Invesco QQQ", 520.00, 0.015),
    listed("iwm", "IWM", "iShares Russell 2000", 225.00, 0.018),
    listed("vti", "VTI", "Vanguard Total Stock", 285.00, 0.012),
    listed("efa", "EFA", "iShares MSCI EAFE", 82.00, 0.014),
    listed("gld", "GLD", "SPDR Gold Shares", 245.00, 0.01),
    listed("voo", "VOO", "Vanguard S&P 500", 545.00, 0.012),
    listed("arkk", "ARKK", "ARK Innovation", 52.00, 0.035),
];

pub static FUTURES_TABLE: [SyntheticInstrument; 8] = [
    listed("xau", "XAU", "Gold", 2650.0, 0.015),
    listed("xag", "XAG", "Silver", 31.5, 0.025),
    listed("oil", "OIL", "Crude Oil WTI", 72.5, 0.03),
    listed("ng", "NG", "Natural Gas", 3.2, 0.04),
    listed("hg", "HG", "Copper", 4.15, 0.02),
    listed("gc", "GC", "Gold Futures", 2655.0, 0.015),
    listed("si", "SI", "Silver Futures", 31.8, 0.025),
    listed("cl", "CL", "Light Crude", 73.0, 0.03),
];

const fn crypto(
    symbol: &'static str,
    id: &'static str,
    name: &'static str,
    icon: &'static str,
) -> CryptoListing {
    CryptoListing {
        symbol,
        id,
        name,
        icon,
    }
}

const fn listed(
    id: &'static str,
    ticker: &'static str,
    name: &'static str,
    base_price: f64,
    volatility: f64,
) -> SyntheticInstrument {
    SyntheticInstrument {
        id,
        ticker,
        name,
        base_price,
        volatility,
        pair: None,
    }
}

const fn forex(
    id: &'static str,
    ticker: &'static str,
    base_price: f64,
    volatility: f64,
    base: &'static str,
    quote: &'static str,
) -> SyntheticInstrument {
    SyntheticInstrument {
        id,
        ticker,
        name: ticker,
        base_price,
        volatility,
        pair: Some((base, quote)),
    }
}

pub fn crypto_listing(symbol: &str) -> Option<&'static CryptoListing> {
    CRYPTO_WATCHLIST
        .iter()
        .find(|listing| listing.symbol.eq_ignore_ascii_case(symbol))
}

pub fn crypto_icon_url(listing: &CryptoListing) -> String {
    format!("{COINGECKO_IMAGES}/{}", listing.icon)
}

fn currency_country_code(currency: &str) -> &'static str {
    match currency {
        "EUR" => "eu",
        "USD" => "us",
        "GBP" => "gb",
        "JPY" => "jp",
        "CHF" => "ch",
        "AUD" => "au",
        "CAD" => "ca",
        "NZD" => "nz",
        "CNH" => "cn",
        "HKD" => "hk",
        "SGD" => "sg",
        _ => "un",
    }
}

pub fn flag_url(currency: &str) -> String {
    format!(
        "{FLAG_CDN_BASE_URL}/{}.png",
        currency_country_code(&currency.to_ascii_uppercase())
    )
}
