use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::error::AppError;
use crate::notify::AlertSender;

use super::types::{TwilioApiErrorResponse, TwilioMessageResponse};

pub struct TwilioClient {
    http: reqwest::Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
    from: String,
    to: String,
}

impl TwilioClient {
    pub fn new(
        base_url: &str,
        account_sid: &str,
        auth_token: &str,
        from: &str,
        to: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build messaging HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            account_sid: account_sid.to_string(),
            auth_token: auth_token.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        )
    }

    pub async fn create_message(&self, body: &str) -> Result<TwilioMessageResponse> {
        tracing::debug!(to = %self.to, "Sending message");
        let resp = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("From", self.from.as_str()), ("To", self.to.as_str()), ("Body", body)])
            .send()
            .await
            .context("create_message HTTP failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            if let Ok(err) = serde_json::from_str::<TwilioApiErrorResponse>(&text) {
                return Err(AppError::MessagingApi {
                    code: err.code,
                    msg: err.message,
                }
                .into());
            }
            return Err(anyhow::anyhow!("Message request failed ({}): {}", status, text));
        }

        let message: TwilioMessageResponse = resp
            .json()
            .await
            .context("failed to decode message response")?;
        tracing::debug!(
            sid = %message.sid,
            status = message.status.as_deref().unwrap_or("unknown"),
            "Message accepted"
        );
        Ok(message)
    }
}

#[async_trait]
impl AlertSender for TwilioClient {
    async fn send(&self, body: &str) -> Result<String> {
        Ok(self.create_message(body).await?.sid)
    }
}
