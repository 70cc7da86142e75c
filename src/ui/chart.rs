use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};

use crate::model::band::ThresholdBand;
use crate::model::candle::Candle;

/// Columns per candle: one for the candle, one gap.
const SLOT_WIDTH: u16 = 2;

pub struct CandleChart<'a> {
    candles: &'a [Candle],
    title: String,
    band: Option<ThresholdBand>,
}

impl<'a> CandleChart<'a> {
    pub fn new(candles: &'a [Candle], symbol: &str, interval: &str) -> Self {
        Self {
            candles,
            title: format!(" {} {} ", symbol, interval),
            band: None,
        }
    }

    pub fn band(mut self, band: Option<ThresholdBand>) -> Self {
        self.band = band;
        self
    }
}

/// Map `price` onto a row index in `0..rows`, row 0 at the top (max price).
pub fn price_to_row(price: f64, min: f64, max: f64, rows: u16) -> u16 {
    if rows <= 1 {
        return 0;
    }
    let span = max - min;
    if span <= 0.0 || !span.is_finite() {
        return (rows - 1) / 2;
    }
    let normalized = ((max - price) / span).clamp(0.0, 1.0);
    (normalized * f64::from(rows - 1)).round() as u16
}

fn format_time(ms: u64) -> String {
    chrono::DateTime::from_timestamp_millis(ms as i64)
        .map(|dt| dt.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

impl Widget for CandleChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.is_empty() {
            return;
        }

        if self.candles.is_empty() {
            buf.set_string(
                inner.x,
                inner.y,
                "Waiting for price...",
                Style::default().fg(Color::DarkGray),
            );
            return;
        }
        if inner.height < 3 || inner.width < 12 {
            return;
        }

        let rows = inner.height - 1; // bottom row is the time axis
        let label_width: u16 = 10;
        let plot_x = inner.x + label_width;
        let plot_width = inner.width - label_width;
        let capacity = (plot_width / SLOT_WIDTH).max(1) as usize;
        let visible = &self.candles[self.candles.len().saturating_sub(capacity)..];

        let min_price = visible.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let max_price = visible
            .iter()
            .map(|c| c.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let (min_price, max_price) = if max_price - min_price < 0.01 {
            (min_price - 0.5, max_price + 0.5)
        } else {
            (min_price, max_price)
        };

        // Band limits go underneath the candles.
        if let Some(band) = self.band {
            for bound in [band.low(), band.high()] {
                if bound >= min_price && bound <= max_price {
                    let y = inner.y + price_to_row(bound, min_price, max_price, rows);
                    for x in plot_x..plot_x + plot_width {
                        buf.set_string(x, y, "┄", Style::default().fg(Color::Yellow));
                    }
                }
            }
        }

        for (i, candle) in visible.iter().enumerate() {
            let x = plot_x + i as u16 * SLOT_WIDTH;
            let color = if candle.is_bullish() {
                Color::Green
            } else {
                Color::Red
            };
            let style = Style::default().fg(color);

            let high_row = price_to_row(candle.high, min_price, max_price, rows);
            let low_row = price_to_row(candle.low, min_price, max_price, rows);
            let open_row = price_to_row(candle.open, min_price, max_price, rows);
            let close_row = price_to_row(candle.close, min_price, max_price, rows);
            let (body_top, body_bottom) = (open_row.min(close_row), open_row.max(close_row));

            for row in high_row..=low_row {
                let glyph = if row >= body_top && row <= body_bottom {
                    "┃"
                } else {
                    "│"
                };
                buf.set_string(x, inner.y + row, glyph, style);
            }
        }

        let label_style = Style::default().fg(Color::DarkGray);
        buf.set_string(inner.x, inner.y, format!("{:.2}", max_price), label_style);
        buf.set_string(
            inner.x,
            inner.y + rows - 1,
            format!("{:.2}", min_price),
            label_style,
        );

        let axis_y = inner.y + rows;
        if let Some(first) = visible.first() {
            buf.set_string(plot_x, axis_y, format_time(first.open_time), label_style);
        }
        if visible.len() > 1 {
            if let Some(last) = visible.last() {
                let text = format_time(last.open_time);
                let x = (plot_x + plot_width).saturating_sub(text.len() as u16);
                if x > plot_x + 9 {
                    buf.set_string(x, axis_y, text, label_style);
                }
            }
        }
    }
}
