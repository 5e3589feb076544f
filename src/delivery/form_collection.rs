use reqwest::{Client, Url};

use crate::domain::SignupRecord;

use super::ChannelError;

/// Client for the last delivery channel: a third-party form collection
/// service that accepts submissions but returns an opaque response.
///
/// Because the response cannot be interpreted, a completed HTTP exchange
/// counts as delivered whatever the status code. Only a transport failure
/// (connect error, timeout) fails the channel.
#[derive(Debug)]
pub struct FormCollectionClient {
    endpoint: Url,
    http_client: Client,
}

impl FormCollectionClient {
    pub fn new(http_client: Client, endpoint: Url) -> Self {
        Self {
            endpoint,
            http_client,
        }
    }

    /// Fire the record at the collection endpoint.
    pub async fn dispatch(&self, record: &SignupRecord, subject: &str) -> Result<(), ChannelError> {
        let mut fields = vec![
            ("Subject", subject.to_owned()),
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

        // The status is deliberately not inspected.
        self.http_client
            .post(self.endpoint.clone())
            .form(&fields)
            .send()
            .await
            .map_err(ChannelError::Request)?;

        Ok(())
    }
}
