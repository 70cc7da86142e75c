use crate::model::candle::Candle;
use crate::model::tick::PriceTick;
use crate::notify::NotifyOutcome;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Price(PriceTick),
    Candles(Vec<Candle>),
    Alert(NotifyOutcome),
    FetchSkipped,
    PollingState { running: bool },
}
