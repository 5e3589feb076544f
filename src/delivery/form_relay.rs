use reqwest::{Client, Url};

use crate::domain::{ContactEmail, SignupRecord};

use super::ChannelError;

/// Client for the primary form relay: a hosted service that turns a form
/// POST into an email in the operator's inbox.
#[derive(Debug)]
pub struct FormRelayClient {
    endpoint: Url,
    operator: ContactEmail,
    http_client: Client,
}

impl FormRelayClient {
    pub fn new(http_client: Client, endpoint: Url, operator: ContactEmail) -> Self {
        Self {
            endpoint,
            operator,
            http_client,
        }
    }

    /// Relay the record as a form-encoded POST.
    ///
    /// The underscore-prefixed fields steer the relay service (recipient
    /// override, subject, reply-to); the rest carry the record under the
    /// keys the operator reads in the resulting email. Handles the applicant
    /// left blank are not sent.
    pub async fn deliver(&self, record: &SignupRecord, subject: &str) -> Result<(), ChannelError> {
        let mut fields: Vec<(&str, String)> = vec![
            ("_recipient", self.operator.as_ref().to_owned()),
            ("_subject", subject.to_owned()),
            ("_replyto", record.email.as_ref().to_owned()),
            ("Artist Name", record.artist_name.as_ref().to_owned()),
            ("Email", record.email.as_ref().to_owned()),
        ];
        if let Some(x_username) = &record.x_username {
            fields.push(("X (Twitter)", x_username.clone()));
        }
        if let Some(telegram_username) = &record.telegram_username {
            fields.push(("Telegram", telegram_username.clone()));
        }
        if let Some(whatsapp_number) = &record.whatsapp_number {
            fields.push(("WhatsApp", whatsapp_number.clone()));
        }
        fields.push(("Submitted", record.submitted_at.to_rfc2822()));

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .form(&fields)
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
