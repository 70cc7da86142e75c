use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("market {0} not found in ticker response")]
    MarketNotFound(String),

    #[error("invalid price for {market}: {raw}")]
    InvalidPrice { market: String, raw: String },

    #[error("invalid band: {0}")]
    InvalidBand(String),

    #[error("messaging API error (code {code}): {msg}")]
    MessagingApi { code: i64, msg: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
