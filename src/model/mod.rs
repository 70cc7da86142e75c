pub mod band;
pub mod candle;
pub mod tick;
