use serde::Deserialize;

/// Deserialize a price that the exchange may encode as a string or a number.
/// Missing, null and unparsable values map to `None`.
pub fn string_or_number_to_f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match v {
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        _ => None,
    })
}

/// One entry of `GET /exchange/ticker`. Other fields (bid, ask, volume, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinDcxTicker {
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default, deserialize_with = "string_or_number_to_f64_opt")]
    pub last_price: Option<f64>,
}

impl CoinDcxTicker {
    pub fn is_market(&self, symbol: &str) -> bool {
        self.market.as_deref() == Some(symbol)
    }

    /// The last price when it is a usable positive number.
    pub fn usable_price(&self) -> Option<f64> {
        self.last_price.filter(|p| p.is_finite() && *p > 0.0)
    }
}

/// Decode the ticker array. Entries that are not ticker objects are dropped
/// so one malformed market cannot hide the others.
pub fn parse_tickers(body: &[u8]) -> Result<Vec<CoinDcxTicker>, serde_json::Error> {
    let entries: Vec<serde_json::Value> = serde_json::from_slice(body)?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect())
}

/// Linear scan for `symbol`; the first matching market decides.
pub fn find_last_price(tickers: &[CoinDcxTicker], symbol: &str) -> Option<f64> {
    tickers
        .iter()
        .find(|t| t.is_market(symbol))
        .and_then(CoinDcxTicker::usable_price)
}
