use chrono::{DateTime, Utc};

use super::{ArtistName, ContactEmail};

/// A validated artist signup, as handed to the delivery pipeline.
///
/// Only the name and email are mandatory; the remaining contact handles are
/// whatever the applicant chose to share, with blank inputs already
/// normalised away. A record is immutable once constructed: `submitted_at`
/// is stamped at the submission boundary and the pipeline hands the record
/// back untouched if delivery fails.
#[derive(Debug, Clone, PartialEq)]
pub struct SignupRecord {
    pub artist_name: ArtistName,
    pub email: ContactEmail,
    pub x_username: Option<String>,
    pub telegram_username: Option<String>,
    pub whatsapp_number: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl SignupRecord {
    /// Render the record as a short human-readable block, one labelled line
    /// per field. Handles the applicant left blank are omitted.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Artist name: {}", self.artist_name.as_ref()),
            format!("Email: {}", self.email.as_ref()),
        ];
        if let Some(x_username) = &self.x_username {
            lines.push(format!("X (Twitter): {x_username}"));
        }
        if let Some(telegram_username) = &self.telegram_username {
            lines.push(format!("Telegram: {telegram_username}"));
        }
        if let Some(whatsapp_number) = &self.whatsapp_number {
            lines.push(format!("WhatsApp: {whatsapp_number}"));
        }
        lines.push(format!("Submitted: {}", self.submitted_at.to_rfc2822()));

        lines.join("\n")
    }
}
