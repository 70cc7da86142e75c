use std::collections::HashMap;
use std::path::Path;

use band_watch::config::{Config, TWILIO_AUTH_TOKEN_ENV, TWILIO_SID_ENV};
use band_watch::notify::AlertPolicy;

const SAMPLE: &str = r#"
[market]
ticker_url = "https://api.coindcx.com/exchange/ticker"
symbol = "ethusdt"
poll_interval_ms = 1000
request_timeout_ms = 10000

[candles]
interval = "1m"
max_candles = 100

[band]
low = 2500.0
high = 2800.0

[notify]
enabled = true
api_base_url = "https://api.twilio.com"
from = "whatsapp:+14155238886"
to = "whatsapp:+15005550006"

[notify.policy]
kind = "cooldown"
cooldown_secs = 300

[ui]
refresh_rate_ms = 100
chart_height = 20

[logging]
level = "debug"
"#;

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn parse_sample_toml() {
    let config: Config = toml::from_str(SAMPLE).unwrap();
    assert_eq!(config.market.market_symbol(), "ETHUSDT");
    assert_eq!(config.candles.window_ms().unwrap(), 60_000);
    assert_eq!(config.candles.max_candles, 100);
    assert!((config.band.step - 10.0).abs() < f64::EPSILON);
    assert_eq!(
        config.notify.policy,
        AlertPolicy::Cooldown { cooldown_secs: 300 }
    );
    assert_eq!(config.notify.request_timeout_ms, 10_000);
    assert!(config.notify.account_sid.is_empty());
}

#[test]
fn shipped_default_config_parses() {
    let config = Config::load_from(Path::new("config/default.toml")).unwrap();
    assert_eq!(config.market.market_symbol(), "ETHUSDT");
    assert_eq!(config.notify.policy, AlertPolicy::EveryTick);
    let band = config.band.to_band().unwrap();
    assert!((band.low() - 2500.0).abs() < f64::EPSILON);
    assert!((band.high() - 2800.0).abs() < f64::EPSILON);
}

#[test]
fn missing_policy_defaults_to_every_tick() {
    let without_policy = SAMPLE.replace(
        "[notify.policy]\nkind = \"cooldown\"\ncooldown_secs = 300\n",
        "",
    );
    let config: Config = toml::from_str(&without_policy).unwrap();
    assert_eq!(config.notify.policy, AlertPolicy::EveryTick);
}

#[test]
fn credentials_are_required_when_notifications_enabled() {
    let mut config: Config = toml::from_str(SAMPLE).unwrap();
    let vars = env(&[(TWILIO_SID_ENV, "AC123")]);
    let err = config
        .notify
        .load_credentials(|k| vars.get(k).cloned())
        .unwrap_err();
    assert!(err.to_string().contains(TWILIO_AUTH_TOKEN_ENV));
    // Startup validation also refuses to run without them.
    assert!(config.validate().is_err());

    let vars = env(&[(TWILIO_SID_ENV, "AC123"), (TWILIO_AUTH_TOKEN_ENV, "secret")]);
    config
        .notify
        .load_credentials(|k| vars.get(k).cloned())
        .unwrap();
    assert_eq!(config.notify.account_sid, "AC123");
    config.validate().unwrap();
}

#[test]
fn credentials_are_optional_when_notifications_disabled() {
    let mut config: Config = toml::from_str(SAMPLE).unwrap();
    config.notify.enabled = false;
    config.notify.load_credentials(|_| None).unwrap();
    config.validate().unwrap();
}

#[test]
fn validate_rejects_bad_values() {
    let mut base: Config = toml::from_str(SAMPLE).unwrap();
    base.notify.enabled = false;

    let mut c = base.clone();
    c.band.low = 3000.0;
    assert!(c.validate().is_err());

    let mut c = base.clone();
    c.candles.interval = "0m".to_string();
    assert!(c.validate().is_err());

    let mut c = base.clone();
    c.candles.interval = "1µ".to_string();
    assert!(c.validate().is_err());

    let mut c = base.clone();
    c.candles.max_candles = 0;
    assert!(c.validate().is_err());

    let mut c = base.clone();
    c.market.ticker_url = "not a url".to_string();
    assert!(c.validate().is_err());

    let mut c = base.clone();
    c.market.poll_interval_ms = 0;
    assert!(c.validate().is_err());

    let mut c = base.clone();
    c.band.step = 0.0;
    assert!(c.validate().is_err());

    let mut c = base;
    c.notify.policy = AlertPolicy::Cooldown { cooldown_secs: 0 };
    assert!(c.validate().is_err());
}
