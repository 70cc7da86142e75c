use crate::error::AppError;

/// Inclusive `[low, high]` price range that triggers an alert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdBand {
    low: f64,
    high: f64,
}

impl ThresholdBand {
    pub fn new(low: f64, high: f64) -> Result<Self, AppError> {
        if !low.is_finite() || !high.is_finite() {
            return Err(AppError::InvalidBand(format!(
                "bounds must be finite (low={}, high={})",
                low, high
            )));
        }
        if low > high {
            return Err(AppError::InvalidBand(format!(
                "low {:.2} is above high {:.2}",
                low, high
            )));
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn contains(&self, price: f64) -> bool {
        self.low <= price && price <= self.high
    }

    pub fn with_low(&self, low: f64) -> Result<Self, AppError> {
        Self::new(low, self.high)
    }

    pub fn with_high(&self, high: f64) -> Result<Self, AppError> {
        Self::new(self.low, high)
    }
}
