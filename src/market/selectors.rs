//! Pure views derived from the cached market list.

use rust_decimal::Decimal;

use crate::models::{MarketData, MarketKind, MarketSnapshot, MarketSymbol};

/// Looks up one market by symbol across both lists.
pub fn find<'a>(snapshot: &'a MarketSnapshot, symbol: &MarketSymbol) -> Option<&'a MarketData> {
    all_markets(snapshot).find(|m| &m.symbol == symbol)
}

/// Futures first, then spot, in feed order.
pub fn all_markets(snapshot: &MarketSnapshot) -> impl Iterator<Item = &MarketData> {
    snapshot.futures.iter().chain(snapshot.spot.iter())
}

pub fn by_kind(snapshot: &MarketSnapshot, kind: MarketKind) -> &[MarketData] {
    match kind {
        MarketKind::Futures => &snapshot.futures,
        MarketKind::Spot => &snapshot.spot,
    }
}

/// Markets whose symbol is in `favorites`, in favourite order.
pub fn favorites<'a>(
    snapshot: &'a MarketSnapshot,
    favorites: &[MarketSymbol],
) -> Vec<&'a MarketData> {
    favorites
        .iter()
        .filter_map(|symbol| find(snapshot, symbol))
        .collect()
}

/// The `limit` markets with the largest absolute 24h change.
pub fn top_movers(snapshot: &MarketSnapshot, limit: usize) -> Vec<&MarketData> {
    let mut markets: Vec<&MarketData> = all_markets(snapshot).collect();
    markets.sort_by(|a, b| b.change_24h.abs().cmp(&a.change_24h.abs()));
    markets.truncate(limit);
    markets
}

/// All markets sorted by quote-denominated 24h volume, highest first.
pub fn by_volume(snapshot: &MarketSnapshot) -> Vec<&MarketData> {
    let mut markets: Vec<&MarketData> = all_markets(snapshot).collect();
    markets.sort_by(|a, b| quote_volume(b).cmp(&quote_volume(a)));
    markets
}

/// Case-insensitive substring match on symbol, base or quote.
pub fn search<'a>(snapshot: &'a MarketSnapshot, query: &str) -> Vec<&'a MarketData> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return all_markets(snapshot).collect();
    }
    all_markets(snapshot)
        .filter(|m| matches(m, &needle))
        .collect()
}

/// Whether `market` matches an already-lowercased search needle.
pub fn matches(market: &MarketData, needle: &str) -> bool {
    needle.is_empty()
        || market.symbol.as_str().to_lowercase().contains(needle)
        || market.base.to_lowercase().contains(needle)
        || market.quote.to_lowercase().contains(needle)
}

/// Saturates instead of overflowing on outsized records.
fn quote_volume(market: &MarketData) -> Decimal {
    market
        .volume_24h
        .checked_mul(market.last_price)
        .unwrap_or(Decimal::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn market(symbol: &str, kind: MarketKind, change: Decimal, volume: Decimal) -> MarketData {
        let (base, quote) = symbol.split_once('-').unwrap_or((symbol, "USD"));
        MarketData {
            symbol: MarketSymbol::new(symbol),
            kind,
            base: base.to_string(),
            quote: quote.to_string(),
            tick_size: dec!(0.1),
            step_size: dec!(0.001),
            price_precision: 1,
            size_precision: 3,
            last_price: dec!(100),
            change_24h: change,
            volume_24h: volume,
            funding_rate: None,
            mark_price: None,
            index_price: None,
            open_interest: None,
            feed_symbol: None,
        }
    }

    fn snapshot() -> MarketSnapshot {
        MarketSnapshot {
            futures: vec![
                market("BTC-PERP", MarketKind::Futures, dec!(1.5), dec!(900)),
                market("ETH-PERP", MarketKind::Futures, dec!(-4.0), dec!(300)),
            ],
            spot: vec![market("SOL-USDC", MarketKind::Spot, dec!(2.0), dec!(1200))],
        }
    }

    #[test]
    fn finds_across_lists() {
        let snap = snapshot();
        assert!(find(&snap, &"SOL-USDC".into()).is_some());
        assert!(find(&snap, &"DOGE-PERP".into()).is_none());
        assert_eq!(by_kind(&snap, MarketKind::Spot).len(), 1);
    }

    #[test]
    fn favorites_keep_their_order_and_skip_unknown() {
        let snap = snapshot();
        let favs = [
            MarketSymbol::new("SOL-USDC"),
            MarketSymbol::new("XRP-PERP"),
            MarketSymbol::new("BTC-PERP"),
        ];
        let symbols: Vec<_> = favorites(&snap, &favs).iter().map(|m| m.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["SOL-USDC", "BTC-PERP"]);
    }

    #[test]
    fn movers_rank_by_absolute_change() {
        let snap = snapshot();
        let symbols: Vec<_> = top_movers(&snap, 2).iter().map(|m| m.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ETH-PERP", "SOL-USDC"]);
    }

    #[test]
    fn volume_ranking_is_descending() {
        let snap = snapshot();
        let symbols: Vec<_> = by_volume(&snap).iter().map(|m| m.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["SOL-USDC", "BTC-PERP", "ETH-PERP"]);
    }

    #[test]
    fn outsized_volume_saturates() {
        let mut snap = snapshot();
        snap.spot[0].volume_24h = Decimal::MAX;
        snap.spot[0].last_price = dec!(1000);
        let symbols: Vec<_> = by_volume(&snap).iter().map(|m| m.symbol.as_str()).collect();
        assert_eq!(symbols[0], "SOL-USDC");
    }

    #[test]
    fn search_is_case_insensitive() {
        let snap = snapshot();
        assert_eq!(search(&snap, "eth").len(), 1);
        assert_eq!(search(&snap, "usd").len(), 1);
        assert_eq!(search(&snap, "  ").len(), 3);
    }
}
