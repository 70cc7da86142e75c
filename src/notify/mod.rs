use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::model::band::ThresholdBand;

/// Outbound message channel used for band alerts.
#[async_trait]
pub trait AlertSender: Send + Sync {
    /// Send `body` and return the provider's message id.
    async fn send(&self, body: &str) -> Result<String>;
}

/// When an in-band price actually produces a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertPolicy {
    /// Every in-band tick sends.
    #[default]
    EveryTick,
    /// Only the tick that moves the price from outside into the band sends.
    EnterBand,
    /// In-band ticks send unless a message went out within the cooldown.
    Cooldown { cooldown_secs: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    OutOfBand,
    Suppressed,
    Disabled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotifyOutcome {
    Sent { message_id: String, body: String },
    Failed { body: String, error: String },
    Skipped(SkipReason),
}

impl NotifyOutcome {
    pub fn attempted(&self) -> bool {
        matches!(self, Self::Sent { .. } | Self::Failed { .. })
    }
}

pub fn format_alert(symbol: &str, price: f64, band: &ThresholdBand) -> String {
    format!(
        "{} Alert: Current Price = {:.2} (within {:.2}-{:.2})",
        symbol,
        price,
        band.low(),
        band.high()
    )
}

pub struct Notifier<S> {
    sender: Option<S>,
    policy: AlertPolicy,
    was_in_band: bool,
    last_sent_ms: Option<u64>,
}

impl<S: AlertSender> Notifier<S> {
    pub fn new(sender: S, policy: AlertPolicy) -> Self {
        Self {
            sender: Some(sender),
            policy,
            was_in_band: false,
            last_sent_ms: None,
        }
    }

    /// A notifier that never sends; in-band ticks report `Skipped(Disabled)`.
    pub fn disabled() -> Self {
        Self {
            sender: None,
            policy: AlertPolicy::EveryTick,
            was_in_band: false,
            last_sent_ms: None,
        }
    }

    pub fn policy(&self) -> AlertPolicy {
        self.policy
    }

    pub async fn notify_if_in_band(
        &mut self,
        symbol: &str,
        price: f64,
        band: &ThresholdBand,
        now_ms: u64,
    ) -> NotifyOutcome {
        let in_band = band.contains(price);
        let entered = in_band && !self.was_in_band;
        self.was_in_band = in_band;
        if !in_band {
            return NotifyOutcome::Skipped(SkipReason::OutOfBand);
        }

        let Some(sender) = self.sender.as_ref() else {
            return NotifyOutcome::Skipped(SkipReason::Disabled);
        };

        let allowed = match self.policy {
            AlertPolicy::EveryTick => true,
            AlertPolicy::EnterBand => entered,
            AlertPolicy::Cooldown { cooldown_secs } => self.last_sent_ms.map_or(true, |last| {
                now_ms.saturating_sub(last) >= cooldown_secs.saturating_mul(1000)
            }),
        };
        if !allowed {
            return NotifyOutcome::Skipped(SkipReason::Suppressed);
        }

        let body = format_alert(symbol, price, band);
        match sender.send(&body).await {
            Ok(message_id) => {
                self.last_sent_ms = Some(now_ms);
                tracing::info!(symbol, price, message_id = %message_id, "Band alert sent");
                NotifyOutcome::Sent { message_id, body }
            }
            Err(e) => {
                tracing::warn!(symbol, price, error = %e, "Band alert failed");
                NotifyOutcome::Failed {
                    body,
                    error: format!("{:#}", e),
                }
            }
        }
    }
}
