//! Popular symbols, grouped the way the `symbols` command prints them.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct StockSymbols {
    pub tech: &'static [&'static str],
    pub finance: &'static [&'static str],
    pub indices: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct CommoditySymbols {
    pub metals: &'static [&'static str],
    pub energy: &'static [&'static str],
    pub agriculture: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct SymbolCatalog {
    pub stocks: StockSymbols,
    pub commodities: CommoditySymbols,
    pub crypto: &'static [&'static str],
    pub forex: &'static [&'static str],
}

pub const POPULAR_SYMBOLS: SymbolCatalog = SymbolCatalog {
    stocks: StockSymbols {
        tech: &["AAPL", "GOOGL", "MSFT", "AMZN", "TSLA", "META", "NVDA"],
        finance: &["JPM", "BAC", "WFC", "GS", "MS"],
        indices: &["^GSPC", "^DJI", "^IXIC", "^RUT"],
    },
    commodities: CommoditySymbols {
        metals: &["GC=F", "SI=F", "PL=F", "PA=F"],
        energy: &["CL=F", "NG=F", "BZ=F"],
        agriculture: &["ZC=F", "ZS=F", "ZW=F"],
    },
    crypto: &["BTC-USD", "ETH-USD", "BNB-USD", "XRP-USD", "ADA-USD"],
    forex: &["EURUSD=X", "GBPUSD=X", "USDJPY=X", "AUDUSD=X"],
};

impl SymbolCatalog {
    /// Every symbol, in catalog order.
    pub fn all(&self) -> Vec<&'static str> {
        [
            self.stocks.tech,
            self.stocks.finance,
            self.stocks.indices,
            self.commodities.metals,
            self.commodities.energy,
            self.commodities.agriculture,
            self.crypto,
            self.forex,
        ]
        .concat()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        let symbol = symbol.to_uppercase();
        self.all().iter().any(|s| *s == symbol)
    }
}
