use crate::domain::{ContactEmail, SignupRecord};

/// Build a `mailto:` URI addressed to the operator, pre-filled with the
/// submission subject and a plain-text rendering of the record.
///
/// Returned to the caller when every delivery channel has failed, so the
/// signup can still reach the operator through the visitor's mail client.
pub fn mailto_uri(record: &SignupRecord, operator: &ContactEmail, subject: &str) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        operator.as_ref(),
        urlencoding::Encoded::new(subject),
        urlencoding::Encoded::new(record.summary()),
    )
}

/// Build the text block a caller can place on the clipboard as the last
/// manual fallback. Contains every non-empty record field and spells out
/// the operator address to forward it to.
pub fn copy_text(record: &SignupRecord, operator: &ContactEmail) -> String {
    format!(
        "{}\n\nPlease forward this signup to {}.",
        record.summary(),
        operator.as_ref()
    )
}
