use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use crate::event::AppEvent;
use crate::model::band::ThresholdBand;
use crate::model::candle::{CandleSeries, FoldOutcome};
use crate::model::tick::PriceTick;
use crate::notify::{AlertSender, Notifier, NotifyOutcome};

/// Source of last-traded prices. `None` means no price this tick.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch(&self) -> Option<PriceTick>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Skipped,
    Processed {
        tick: PriceTick,
        fold: FoldOutcome,
        notify: NotifyOutcome,
    },
}

/// Poll loop state: owns the candle series and notifier, reads the band from a
/// watch channel and publishes snapshots to the UI.
pub struct Monitor<P, S> {
    source: P,
    series: CandleSeries,
    notifier: Notifier<S>,
    band_rx: watch::Receiver<ThresholdBand>,
    app_tx: mpsc::Sender<AppEvent>,
    poll_interval: Duration,
}

impl<P: PriceSource, S: AlertSender> Monitor<P, S> {
    pub fn new(
        source: P,
        series: CandleSeries,
        notifier: Notifier<S>,
        band_rx: watch::Receiver<ThresholdBand>,
        app_tx: mpsc::Sender<AppEvent>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            source,
            series,
            notifier,
            band_rx,
            app_tx,
            poll_interval,
        }
    }

    pub fn series(&self) -> &CandleSeries {
        &self.series
    }

    /// One fetch → fold → notify pass.
    pub async fn on_tick(&mut self) -> TickOutcome {
        let Some(tick) = self.source.fetch().await else {
            let _ = self.app_tx.send(AppEvent::FetchSkipped).await;
            return TickOutcome::Skipped;
        };

        let fold = self.series.fold(tick.price, tick.timestamp_ms);
        if fold == FoldOutcome::Opened {
            tracing::debug!(
                symbol = %tick.symbol,
                open_time = tick.timestamp_ms,
                candles = self.series.len(),
                "Opened candle"
            );
        }
        let _ = self.app_tx.send(AppEvent::Price(tick.clone())).await;
        let _ = self
            .app_tx
            .send(AppEvent::Candles(self.series.candles().to_vec()))
            .await;

        let band = *self.band_rx.borrow();
        let notify = self
            .notifier
            .notify_if_in_band(&tick.symbol, tick.price, &band, tick.timestamp_ms)
            .await;
        if notify.attempted() {
            let _ = self.app_tx.send(AppEvent::Alert(notify.clone())).await;
        }

        TickOutcome::Processed { tick, fold, notify }
    }

    /// Poll every `poll_interval` until `shutdown` changes. Ticks are skipped
    /// while `running` is false. A slow fetch delays the next tick rather than
    /// triggering a burst.
    pub async fn run(mut self, running: watch::Receiver<bool>, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            policy = ?self.notifier.policy(),
            "Monitor started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !*running.borrow() {
                        continue;
                    }
                    self.on_tick().await;
                }
                _ = shutdown.changed() => {
                    break;
                }
            }
        }
        tracing::info!(candles = self.series.len(), "Monitor stopped");
    }
}
