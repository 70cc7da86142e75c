use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::input::{BandEditor, BandField};
use crate::model::band::ThresholdBand;

use super::{AlertBanner, BannerKind};

pub struct PricePanel<'a> {
    pub symbol: &'a str,
    pub price: Option<f64>,
    pub prev_price: Option<f64>,
    pub in_band: bool,
}

impl Widget for PricePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let price_color = match (self.price, self.prev_price) {
            (Some(p), Some(prev)) if p > prev => Color::Green,
            (Some(p), Some(prev)) if p < prev => Color::Red,
            _ => Color::White,
        };
        let price_str = self
            .price
            .map(|p| format!("{:.2}", p))
            .unwrap_or_else(|| "---".to_string());

        let mut spans = vec![
            Span::styled(
                format!("{}: ", self.symbol),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                price_str,
                Style::default()
                    .fg(price_color)
                    .add_modifier(Modifier::BOLD),
            ),
        ];
        if self.in_band {
            spans.push(Span::styled(
                "  IN BAND",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let block = Block::default()
            .title(" Current Price ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        Paragraph::new(Line::from(spans)).block(block).render(area, buf);
    }
}

pub struct BandPanel<'a> {
    pub band: &'a ThresholdBand,
    pub editor: Option<&'a BandEditor>,
}

impl Widget for BandPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let value_span = |label: &'static str, value: f64, editing: Option<&str>| {
            let text = match editing {
                Some(buffer) => format!("{}_", buffer),
                None => format!("{:.2}", value),
            };
            let style = if editing.is_some() {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            vec![
                Span::styled(label, Style::default().fg(Color::DarkGray)),
                Span::styled(text, style),
            ]
        };

        let editing_low = self
            .editor
            .filter(|e| e.field == BandField::Low)
            .map(|e| e.buffer.as_str());
        let editing_high = self
            .editor
            .filter(|e| e.field == BandField::High)
            .map(|e| e.buffer.as_str());

        let mut spans = value_span("Low: ", self.band.low(), editing_low);
        spans.push(Span::raw("   "));
        spans.extend(value_span("High: ", self.band.high(), editing_high));

        let block = Block::default()
            .title(" Alert Band ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        Paragraph::new(Line::from(spans)).block(block).render(area, buf);
    }
}

pub struct BannerBar<'a> {
    pub banner: Option<&'a AlertBanner>,
}

impl Widget for BannerBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(banner) = self.banner else {
            return;
        };
        if area.is_empty() {
            return;
        }
        let (prefix, style) = match banner.kind {
            BannerKind::Success => (
                " OK ",
                Style::default().fg(Color::Black).bg(Color::Green),
            ),
            BannerKind::Error => (" ERR ", Style::default().fg(Color::White).bg(Color::Red)),
        };
        let line = Line::from(vec![
            Span::styled(prefix, style.add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(banner.text.as_str(), Style::default().fg(Color::White)),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

pub struct LogPanel<'a> {
    messages: &'a [String],
}

impl<'a> LogPanel<'a> {
    pub fn new(messages: &'a [String]) -> Self {
        Self { messages }
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let visible = block.inner(area).height as usize;
        let start = self.messages.len().saturating_sub(visible);

        let lines: Vec<Line> = self.messages[start..]
            .iter()
            .map(|msg| {
                let color = if msg.starts_with("[ERR]") {
                    Color::Red
                } else if msg.starts_with("[WARN]") {
                    Color::Yellow
                } else {
                    Color::Gray
                };
                Line::from(Span::styled(msg.as_str(), Style::default().fg(color)))
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct StatusBar<'a> {
    pub symbol: &'a str,
    pub paused: bool,
    pub notify_enabled: bool,
    pub tick_count: u64,
    pub skipped_count: u64,
    pub alerts_sent: u64,
    pub alerts_failed: u64,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let pause_status = if self.paused {
            Span::styled(
                " PAUSED ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(" POLLING ", Style::default().fg(Color::Green))
        };
        let notify_status = if self.notify_enabled {
            Span::styled("alerts on", Style::default().fg(Color::Green))
        } else {
            Span::styled("alerts off", Style::default().fg(Color::DarkGray))
        };

        let line = Line::from(vec![
            Span::styled(
                " band-watch ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("| ", Style::default().fg(Color::DarkGray)),
            Span::styled(self.symbol, Style::default().fg(Color::Cyan)),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            pause_status,
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            notify_status,
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!(
                    "ticks: {} skipped: {} sent: {} failed: {}",
                    self.tick_count, self.skipped_count, self.alerts_sent, self.alerts_failed
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

pub struct KeybindBar {
    pub editing: bool,
}

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
        let text = |t: &'static str| Span::styled(t, Style::default().fg(Color::DarkGray));

        let line = if self.editing {
            Line::from(vec![
                text(" type a price  "),
                key("[Enter]"),
                text(" apply  "),
                key("[Esc]"),
                text(" cancel  "),
                key("[Bksp]"),
                text(" delete"),
            ])
        } else {
            Line::from(vec![
                key(" [Q]"),
                text("uit  "),
                key("[P]"),
                text("ause  "),
                key("[R]"),
                text("esume  "),
                key("[L]"),
                text("ow  "),
                key("[H]"),
                text("igh  "),
                key("'[' ']'"),
                text(" low -/+  "),
                key("'-' '+'"),
                text(" high -/+"),
            ])
        };

        buf.set_line(area.x, area.y, &line, area.width);
    }
}
