#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub open_time: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    /// Start a new candle at `open_time`. Unlike exchange klines the start is not
    /// aligned to a clock boundary.
    pub fn new(price: f64, open_time: u64) -> Self {
        Self {
            open_time,
            open: price,
            high: price,
            low: price,
            close: price,
        }
    }

    /// Update the candle with a new price.
    pub fn update(&mut self, price: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldOutcome {
    Opened,
    Updated,
}

/// Sliding window of the most recent candles, oldest first.
#[derive(Debug, Clone)]
pub struct CandleSeries {
    candles: Vec<Candle>,
    window_ms: u64,
    max_candles: usize,
}

impl CandleSeries {
    pub fn new(window_ms: u64, max_candles: usize) -> Self {
        assert!(window_ms > 0, "window_ms must be > 0");
        assert!(max_candles > 0, "max_candles must be > 0");
        Self {
            candles: Vec::with_capacity(max_candles),
            window_ms,
            max_candles,
        }
    }

    /// Fold one price observed at `now_ms` into the series.
    ///
    /// A new candle opens when the series is empty or at least `window_ms` has
    /// passed since the last candle opened. A clock that stepped backwards counts
    /// as no elapsed time.
    pub fn fold(&mut self, price: f64, now_ms: u64) -> FoldOutcome {
        let outcome = match self.candles.last_mut() {
            Some(last) if now_ms.saturating_sub(last.open_time) < self.window_ms => {
                last.update(price);
                FoldOutcome::Updated
            }
            _ => {
                self.candles.push(Candle::new(price, now_ms));
                FoldOutcome::Opened
            }
        };

        if self.candles.len() > self.max_candles {
            let excess = self.candles.len() - self.max_candles;
            self.candles.drain(..excess);
        }
        outcome
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candle_update_tracks_extremes() {
        let mut c = Candle::new(100.0, 60_500);
        c.update(105.0);
        c.update(95.0);
        c.update(102.0);

        assert_eq!(c.open_time, 60_500);
        assert!((c.open - 100.0).abs() < f64::EPSILON);
        assert!((c.high - 105.0).abs() < f64::EPSILON);
        assert!((c.low - 95.0).abs() < f64::EPSILON);
        assert!((c.close - 102.0).abs() < f64::EPSILON);
        assert!(c.is_bullish());
    }

    #[test]
    fn bearish_candle() {
        let mut c = Candle::new(100.0, 0);
        c.update(95.0);
        assert!(!c.is_bullish());
    }

    #[test]
    fn window_is_measured_from_candle_creation() {
        let mut s = CandleSeries::new(60_000, 100);
        assert_eq!(s.fold(10.0, 1_030_000), FoldOutcome::Opened);
        // Crosses a clock minute but not 60s from creation.
        assert_eq!(s.fold(11.0, 1_089_999), FoldOutcome::Updated);
        assert_eq!(s.fold(12.0, 1_090_000), FoldOutcome::Opened);
        assert_eq!(s.len(), 2);
        assert_eq!(s.last().unwrap().open_time, 1_090_000);
    }

    #[test]
    fn backwards_clock_updates_open_candle() {
        let mut s = CandleSeries::new(60_000, 100);
        s.fold(10.0, 100_000);
        assert_eq!(s.fold(9.0, 90_000), FoldOutcome::Updated);
        assert_eq!(s.len(), 1);
        assert!((s.last().unwrap().low - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    #[should_panic(expected = "window_ms must be > 0")]
    fn series_rejects_zero_window() {
        let _ = CandleSeries::new(0, 100);
    }
}
