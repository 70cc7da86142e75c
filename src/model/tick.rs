/// One observed last-traded price.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTick {
    pub symbol: String,
    pub price: f64,
    pub timestamp_ms: u64,
}

impl PriceTick {
    /// Stamp `price` with the current wall clock.
    pub fn observed_now(symbol: &str, price: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            price,
            timestamp_ms: now_ms(),
        }
    }
}

pub fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}
