use crossterm::event::KeyCode;

use crate::error::AppError;
use crate::model::band::ThresholdBand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Quit,
    Pause,
    Resume,
    EditBound(BandField),
    LowerBound(BandField),
    RaiseBound(BandField),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandField {
    Low,
    High,
}

impl BandField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    Push(char),
    Backspace,
    Apply,
    Cancel,
}

pub fn parse_main_command(key_code: &KeyCode) -> Option<UiCommand> {
    match key_code {
        KeyCode::Char('[') => Some(UiCommand::LowerBound(BandField::Low)),
        KeyCode::Char(']') => Some(UiCommand::RaiseBound(BandField::Low)),
        KeyCode::Char('-') => Some(UiCommand::LowerBound(BandField::High)),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(UiCommand::RaiseBound(BandField::High)),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Some(UiCommand::Quit),
            'p' => Some(UiCommand::Pause),
            'r' => Some(UiCommand::Resume),
            'l' => Some(UiCommand::EditBound(BandField::Low)),
            'h' => Some(UiCommand::EditBound(BandField::High)),
            _ => None,
        },
        _ => None,
    }
}

pub fn parse_edit_command(key_code: &KeyCode) -> Option<EditCommand> {
    match key_code {
        KeyCode::Char(c) if c.is_ascii_digit() || *c == '.' => Some(EditCommand::Push(*c)),
        KeyCode::Backspace => Some(EditCommand::Backspace),
        KeyCode::Enter => Some(EditCommand::Apply),
        KeyCode::Esc => Some(EditCommand::Cancel),
        _ => None,
    }
}

/// Numeric entry for one band bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandEditor {
    pub field: BandField,
    pub buffer: String,
}

impl BandEditor {
    pub fn new(field: BandField, band: &ThresholdBand) -> Self {
        let current = match field {
            BandField::Low => band.low(),
            BandField::High => band.high(),
        };
        Self {
            field,
            buffer: format!("{}", current),
        }
    }

    pub fn push(&mut self, c: char) {
        if c == '.' && self.buffer.contains('.') {
            return;
        }
        self.buffer.push(c);
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    /// Band with the edited bound replaced.
    pub fn apply(&self, band: &ThresholdBand) -> Result<ThresholdBand, AppError> {
        let value: f64 = self.buffer.parse().map_err(|_| {
            AppError::InvalidBand(format!("'{}' is not a number", self.buffer))
        })?;
        match self.field {
            BandField::Low => band.with_low(value),
            BandField::High => band.with_high(value),
        }
    }
}

/// Move one bound by `delta`, keeping the band ordered.
pub fn step_bound(
    band: &ThresholdBand,
    field: BandField,
    delta: f64,
) -> Result<ThresholdBand, AppError> {
    match field {
        BandField::Low => band.with_low(band.low() + delta),
        BandField::High => band.with_high(band.high() + delta),
    }
}
