use crate::market::format::format_price;
use crate::market::types::{route_ticker, MarketAsset, MarketCategory, RawQuote};

pub fn normalize_quote(quote: RawQuote, category: MarketCategory) -> MarketAsset {
    let name = quote
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| quote.ticker.clone());
    let icon = quote.icon.filter(|icon| !icon.trim().is_empty());
    let flags = match category {
        MarketCategory::Forex => quote.flags,
        _ => None,
    };

    MarketAsset {
        id: quote.id,
        category,
        price_formatted: format_price(quote.price),
        route: route_ticker(&quote.ticker),
        ticker: quote.ticker,
        name,
        price: quote.price,
        change: quote.change,
        change_percent: quote.change_percent,
        chart_data: quote.chart_data,
        icon,
        flags,
    }
}

pub fn normalize_quotes(quotes: Vec<RawQuote>, category: MarketCategory) -> Vec<MarketAsset> {
    quotes
        .into_iter()
        .map(|quote| normalize_quote(quote, category))
        .collect()
}
