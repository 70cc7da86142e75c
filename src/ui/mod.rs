pub mod chart;
pub mod dashboard;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::event::AppEvent;
use crate::input::BandEditor;
use crate::model::band::ThresholdBand;
use crate::model::candle::Candle;
use crate::notify::NotifyOutcome;

use chart::CandleChart;
use dashboard::{BandPanel, BannerBar, KeybindBar, LogPanel, PricePanel, StatusBar};

const MAX_LOG_MESSAGES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertBanner {
    pub kind: BannerKind,
    pub text: String,
}

pub struct AppState {
    pub symbol: String,
    pub interval: String,
    pub last_price: Option<f64>,
    pub prev_price: Option<f64>,
    pub candles: Vec<Candle>,
    pub band: ThresholdBand,
    pub band_step: f64,
    pub editor: Option<BandEditor>,
    pub banner: Option<AlertBanner>,
    pub chart_height: u16,
    pub notify_enabled: bool,
    pub paused: bool,
    pub tick_count: u64,
    pub skipped_count: u64,
    pub alerts_sent: u64,
    pub alerts_failed: u64,
    pub log_messages: Vec<String>,
}

impl AppState {
    pub fn new(symbol: &str, interval: &str, band: ThresholdBand, chart_height: u16) -> Self {
        Self {
            symbol: symbol.to_string(),
            interval: interval.to_string(),
            last_price: None,
            prev_price: None,
            candles: Vec::new(),
            band,
            band_step: 10.0,
            editor: None,
            banner: None,
            chart_height,
            notify_enabled: false,
            paused: false,
            tick_count: 0,
            skipped_count: 0,
            alerts_sent: 0,
            alerts_failed: 0,
            log_messages: Vec::new(),
        }
    }

    pub fn push_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.remove(0);
        }
    }

    pub fn in_band(&self) -> bool {
        self.last_price.is_some_and(|p| self.band.contains(p))
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::Price(tick) => {
                self.tick_count += 1;
                self.prev_price = self.last_price;
                self.last_price = Some(tick.price);
            }
            AppEvent::Candles(candles) => {
                self.candles = candles;
            }
            AppEvent::Alert(outcome) => match outcome {
                NotifyOutcome::Sent { message_id, body } => {
                    self.alerts_sent += 1;
                    self.push_log(format!("Alert sent ({}): {}", message_id, body));
                    self.banner = Some(AlertBanner {
                        kind: BannerKind::Success,
                        text: format!("Alert sent: {}", body),
                    });
                }
                NotifyOutcome::Failed { error, .. } => {
                    self.alerts_failed += 1;
                    self.push_log(format!("[ERR] Alert failed: {}", error));
                    self.banner = Some(AlertBanner {
                        kind: BannerKind::Error,
                        text: format!("Alert failed: {}", error),
                    });
                }
                NotifyOutcome::Skipped(_) => {}
            },
            AppEvent::FetchSkipped => {
                self.skipped_count += 1;
            }
            AppEvent::PollingState { running } => {
                self.paused = !running;
                self.push_log(if running {
                    "Polling resumed".to_string()
                } else {
                    "[WARN] Polling paused".to_string()
                });
            }
        }
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                  // status bar
            Constraint::Length(3),                  // price + band
            Constraint::Length(state.chart_height), // chart
            Constraint::Length(1),                  // alert banner
            Constraint::Min(3),                     // log
            Constraint::Length(1),                  // keybinds
        ])
        .split(frame.area());

    frame.render_widget(
        StatusBar {
            symbol: &state.symbol,
            paused: state.paused,
            notify_enabled: state.notify_enabled,
            tick_count: state.tick_count,
            skipped_count: state.skipped_count,
            alerts_sent: state.alerts_sent,
            alerts_failed: state.alerts_failed,
        },
        outer[0],
    );

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(outer[1]);
    frame.render_widget(
        PricePanel {
            symbol: &state.symbol,
            price: state.last_price,
            prev_price: state.prev_price,
            in_band: state.in_band(),
        },
        top[0],
    );
    frame.render_widget(
        BandPanel {
            band: &state.band,
            editor: state.editor.as_ref(),
        },
        top[1],
    );

    frame.render_widget(
        CandleChart::new(&state.candles, &state.symbol, &state.interval).band(Some(state.band)),
        outer[2],
    );
    frame.render_widget(
        BannerBar {
            banner: state.banner.as_ref(),
        },
        outer[3],
    );
    frame.render_widget(LogPanel::new(&state.log_messages), outer[4]);
    frame.render_widget(
        KeybindBar {
            editing: state.editor.is_some(),
        },
        outer[5],
    );
}
