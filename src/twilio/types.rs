use serde::Deserialize;

/// Subset of the Messages API resource returned on create.
#[derive(Debug, Deserialize)]
pub struct TwilioMessageResponse {
    pub sid: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TwilioApiErrorResponse {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub status: Option<u16>,
}
