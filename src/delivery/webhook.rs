use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};

use crate::domain::{ContactEmail, SignupRecord};

use super::ChannelError;

/// Client for the second delivery channel: a webhook intake that forwards a
/// JSON payload to the operator.
#[derive(Debug)]
pub struct WebhookClient {
    endpoint: Url,
    operator: ContactEmail,
    authorization_token: Secret<String>,
    http_client: Client,
}

impl WebhookClient {
    pub fn new(
        http_client: Client,
        endpoint: Url,
        operator: ContactEmail,
        authorization_token: Secret<String>,
    ) -> Self {
        Self {
            endpoint,
            operator,
            authorization_token,
            http_client,
        }
    }

    /// Deliver the record as a JSON POST.
    ///
    /// The payload carries every record field individually plus a rendered
    /// `message` block, so the receiving automation can either template the
    /// fields or forward the message as-is.
    pub async fn deliver(&self, record: &SignupRecord, subject: &str) -> Result<(), ChannelError> {
        let request_body = WebhookRequest {
            to_email: self.operator.as_ref(),
            subject,
            artist_name: record.artist_name.as_ref(),
            email: record.email.as_ref(),
            x_username: record.x_username.as_deref().unwrap_or(""),
            telegram_username: record.telegram_username.as_deref().unwrap_or(""),
            whatsapp_number: record.whatsapp_number.as_deref().unwrap_or(""),
            submission_time: record.submitted_at.to_rfc3339(),
            message: record.summary(),
        };

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .header("X-Webhook-Token", self.authorization_token.expose_secret())
            .json(&request_body)
            .send()
            .await
            .map_err(ChannelError::Request)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ChannelError::UnexpectedStatus(response.status()))
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct WebhookRequest<'a> {
    to_email: &'a str,
    subject: &'a str,
    artist_name: &'a str,
    email: &'a str,
    x_username: &'a str,
    telegram_username: &'a str,
    whatsapp_number: &'a str,
    submission_time: String,
    message: String,
}
