use anyhow::{bail, ensure, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::model::band::ThresholdBand;
use crate::notify::AlertPolicy;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const CONFIG_PATH_ENV: &str = "BAND_WATCH_CONFIG";
pub const TWILIO_SID_ENV: &str = "TWILIO_SID";
pub const TWILIO_AUTH_TOKEN_ENV: &str = "TWILIO_AUTH_TOKEN";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub market: MarketConfig,
    pub candles: CandleConfig,
    pub band: BandConfig,
    pub notify: NotifyConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    pub ticker_url: String,
    pub symbol: String,
    pub poll_interval_ms: u64,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandleConfig {
    pub interval: String,
    pub max_candles: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BandConfig {
    pub low: f64,
    pub high: f64,
    #[serde(default = "default_band_step")]
    pub step: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    pub enabled: bool,
    pub api_base_url: String,
    pub from: String,
    pub to: String,
    #[serde(default = "default_notify_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub policy: AlertPolicy,
    #[serde(skip)]
    pub account_sid: String,
    #[serde(skip)]
    pub auth_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
    pub chart_height: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

fn default_band_step() -> f64 {
    10.0
}

fn default_notify_timeout_ms() -> u64 {
    10_000
}

/// Parse a candle interval string (e.g. "30s", "1m", "1h", "1d", "1w", "1M") into milliseconds.
pub fn parse_interval_ms(s: &str) -> Result<u64> {
    let Some((split, _)) = s.char_indices().last().filter(|(i, _)| *i > 0) else {
        bail!("invalid interval '{}': expected format like '1m'", s);
    };

    let (num_str, suffix) = s.split_at(split);
    let n: u64 = num_str
        .parse()
        .with_context(|| format!("invalid interval '{}': quantity must be a positive integer", s))?;
    ensure!(n > 0, "invalid interval '{}': quantity must be > 0", s);

    let unit_ms = match suffix {
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        "d" => 86_400_000,
        "w" => 7 * 86_400_000,
        "M" => 30 * 86_400_000,
        _ => bail!(
            "invalid interval '{}': unsupported suffix '{}', expected one of s/m/h/d/w/M",
            s,
            suffix
        ),
    };

    n.checked_mul(unit_ms)
        .with_context(|| format!("invalid interval '{}': value is too large", s))
}

impl MarketConfig {
    /// Market identifier as it appears in the ticker list.
    pub fn market_symbol(&self) -> String {
        self.symbol.trim().to_ascii_uppercase()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl CandleConfig {
    pub fn window_ms(&self) -> Result<u64> {
        parse_interval_ms(&self.interval)
    }
}

impl BandConfig {
    pub fn to_band(&self) -> Result<ThresholdBand> {
        Ok(ThresholdBand::new(self.low, self.high)?)
    }
}

impl NotifyConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Fill the credential fields from `lookup` (normally the process environment).
    /// Only required when notifications are enabled.
    pub fn load_credentials<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if !self.enabled {
            return Ok(());
        }
        self.account_sid = lookup(TWILIO_SID_ENV)
            .filter(|v| !v.trim().is_empty())
            .with_context(|| format!("{} not set in .env or environment", TWILIO_SID_ENV))?;
        self.auth_token = lookup(TWILIO_AUTH_TOKEN_ENV)
            .filter(|v| !v.trim().is_empty())
            .with_context(|| {
                format!("{} not set in .env or environment", TWILIO_AUTH_TOKEN_ENV)
            })?;
        Ok(())
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load_from(Path::new(&path))?;
        config
            .notify
            .load_credentials(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&config_str).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.market.ticker_url).context("market.ticker_url is not a valid URL")?;
        ensure!(
            !self.market.market_symbol().is_empty(),
            "market.symbol must not be empty"
        );
        ensure!(
            self.market.poll_interval_ms > 0,
            "market.poll_interval_ms must be > 0"
        );
        ensure!(
            self.market.request_timeout_ms > 0,
            "market.request_timeout_ms must be > 0"
        );

        self.candles
            .window_ms()
            .context("candles.interval is invalid")?;
        ensure!(self.candles.max_candles > 0, "candles.max_candles must be > 0");

        self.band.to_band().context("band is invalid")?;
        ensure!(
            self.band.step.is_finite() && self.band.step > 0.0,
            "band.step must be a positive number"
        );

        ensure!(self.ui.chart_height >= 4, "ui.chart_height must be >= 4");

        if let AlertPolicy::Cooldown { cooldown_secs } = self.notify.policy {
            ensure!(cooldown_secs > 0, "notify.policy.cooldown_secs must be > 0");
        }
        if self.notify.enabled {
            url::Url::parse(&self.notify.api_base_url)
                .context("notify.api_base_url is not a valid URL")?;
            ensure!(
                !self.notify.from.trim().is_empty() && !self.notify.to.trim().is_empty(),
                "notify.from and notify.to must be set when notifications are enabled"
            );
            ensure!(
                !self.notify.account_sid.is_empty() && !self.notify.auth_token.is_empty(),
                "messaging credentials missing: set {} and {}",
                TWILIO_SID_ENV,
                TWILIO_AUTH_TOKEN_ENV
            );
        }
        Ok(())
    }
}
