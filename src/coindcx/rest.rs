use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::error::AppError;
use crate::model::tick::PriceTick;
use crate::monitor::PriceSource;

use super::types::{find_last_price, parse_tickers, CoinDcxTicker};

pub struct CoinDcxRestClient {
    http: reqwest::Client,
    ticker_url: String,
    symbol: String,
}

impl CoinDcxRestClient {
    pub fn new(ticker_url: &str, symbol: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build ticker HTTP client")?;
        Ok(Self {
            http,
            ticker_url: ticker_url.to_string(),
            symbol: symbol.to_string(),
        })
    }

    pub async fn fetch_tickers(&self) -> Result<Vec<CoinDcxTicker>, AppError> {
        let body = self
            .http
            .get(&self.ticker_url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(parse_tickers(&body)?)
    }

    pub async fn fetch_last_price(&self) -> Result<f64, AppError> {
        let tickers = self.fetch_tickers().await?;
        find_last_price(&tickers, &self.symbol).ok_or_else(|| {
            match tickers.iter().find(|t| t.is_market(&self.symbol)) {
                None => AppError::MarketNotFound(self.symbol.clone()),
                Some(ticker) => AppError::InvalidPrice {
                    market: self.symbol.clone(),
                    raw: ticker
                        .last_price
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| "missing".to_string()),
                },
            }
        })
    }
}

#[async_trait]
impl PriceSource for CoinDcxRestClient {
    async fn fetch(&self) -> Option<PriceTick> {
        match self.fetch_last_price().await {
            Ok(price) => Some(PriceTick::observed_now(&self.symbol, price)),
            Err(e) => {
                tracing::debug!(symbol = %self.symbol, error = %e, "Ticker fetch skipped");
                None
            }
        }
    }
}
