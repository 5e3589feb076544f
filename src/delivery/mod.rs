//! Delivery of validated signups to the operator.
//!
//! A submission travels through up to three channels in a fixed order, each
//! one attempted only after the previous has definitively failed. The chain
//! never runs channels in parallel, so a slow-but-successful channel cannot
//! cause a duplicate notification from the next one.

use reqwest::{Client, StatusCode};
use tracing::{field::display, Span};

use crate::{
    configuration::DeliverySettings,
    domain::{ArtistName, ContactEmail, SignupRecord},
};

mod form_collection;
mod form_relay;
pub mod manual;
mod webhook;

pub use form_collection::FormCollectionClient;
pub use form_relay::FormRelayClient;
pub use webhook::WebhookClient;

/// The channels a signup can be delivered through, in attempt order.
#[derive(Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryChannel {
    FormRelay,
    Webhook,
    FormCollection,
}

impl DeliveryChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FormRelay => "form_relay",
            Self::Webhook => "webhook",
            Self::FormCollection => "form_collection",
        }
    }
}

impl std::fmt::Display for DeliveryChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Debug for DeliveryChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single channel gave up on a submission.
///
/// Never surfaced to the caller. It is logged and used to advance the chain
/// to the next channel.
#[derive(thiserror::Error)]
pub enum ChannelError {
    #[error("Failed to issue the request")]
    Request(#[source] reqwest::Error),
    #[error("The endpoint answered with {0}")]
    UnexpectedStatus(StatusCode),
}

/// Terminal outcome of a submission.
#[derive(Debug)]
pub enum DeliveryResult {
    /// One of the channels accepted the signup.
    Delivered {
        channel: DeliveryChannel,
        reference: String,
    },
    /// Every channel failed. The record is handed back unchanged so the
    /// caller can offer the manual fallback.
    Failed {
        record: SignupRecord,
        reference: String,
    },
}

/// Runs a signup through the delivery chain.
pub struct SignupPipeline {
    form_relay: FormRelayClient,
    webhook: WebhookClient,
    form_collection: FormCollectionClient,
    operator: ContactEmail,
}

impl SignupPipeline {
    pub fn new(
        form_relay: FormRelayClient,
        webhook: WebhookClient,
        form_collection: FormCollectionClient,
        operator: ContactEmail,
    ) -> Self {
        Self {
            form_relay,
            webhook,
            form_collection,
            operator,
        }
    }

    /// The address every channel ultimately notifies.
    pub fn operator(&self) -> &ContactEmail {
        &self.operator
    }

    /// Submit a record through the channels, in order, stopping at the first
    /// success. Consumes the record; on total failure it is handed back
    /// inside [`DeliveryResult::Failed`].
    #[tracing::instrument(
        name = "Submitting a signup through the delivery chain",
        skip(self, record),
        fields(
            artist_name = %record.artist_name,
            reference = tracing::field::Empty,
            channel = tracing::field::Empty,
        ))]
    pub async fn submit(&self, record: SignupRecord) -> DeliveryResult {
        let reference = generate_reference_code();
        Span::current().record("reference", &display(&reference));
        let subject = submission_subject(&record.artist_name, &reference);

        match self.form_relay.deliver(&record, &subject).await {
            Ok(()) => return delivered(DeliveryChannel::FormRelay, reference),
            Err(e) => tracing::warn!(
                error.cause_chain = ?e,
                error.message = %e,
                "Form relay rejected the signup. Falling back to the webhook",
            ),
        }

        match self.webhook.deliver(&record, &subject).await {
            Ok(()) => return delivered(DeliveryChannel::Webhook, reference),
            Err(e) => tracing::warn!(
                error.cause_chain = ?e,
                error.message = %e,
                "Webhook rejected the signup. Falling back to the form collection",
            ),
        }

        match self.form_collection.dispatch(&record, &subject).await {
            Ok(()) => delivered(DeliveryChannel::FormCollection, reference),
            Err(e) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Every delivery channel failed. \
                    Handing the record back for manual fallback",
                );
                DeliveryResult::Failed { record, reference }
            }
        }
    }
}

fn delivered(channel: DeliveryChannel, reference: String) -> DeliveryResult {
    Span::current().record("channel", &display(channel));
    tracing::info!("Signup delivered");
    DeliveryResult::Delivered { channel, reference }
}

/// Subject line shared by every channel for one submission. The reference
/// code lets the operator spot duplicate deliveries of the same signup.
pub fn submission_subject(artist_name: &ArtistName, reference: &str) -> String {
    format!("New artist signup: {artist_name} [{reference}]")
}

/// Generate a random 8-characters-long case-sensitive reference code.
fn generate_reference_code() -> String {
    use rand::{distributions::Alphanumeric, thread_rng, Rng};
    let mut rng = thread_rng();

    std::iter::repeat_with(|| rng.sample(Alphanumeric))
        .map(char::from)
        .take(8)
        .collect()
}

impl TryFrom<&DeliverySettings> for SignupPipeline {
    type Error = String;

    fn try_from(config: &DeliverySettings) -> Result<Self, Self::Error> {
        let operator = config.operator()?;
        let http_client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                tracing::error!("Unable to build the delivery HTTP client: {e}");
                "Failed to build the delivery HTTP client".to_string()
            })?;

        let form_relay = FormRelayClient::new(
            http_client.clone(),
            config.form_relay().url().map_err(|e| {
                tracing::error!("Unable to parse the form relay endpoint: {e}");
                "Form relay endpoint is invalid".to_string()
            })?,
            operator.clone(),
        );
        let webhook = WebhookClient::new(
            http_client.clone(),
            config.webhook().url().map_err(|e| {
                tracing::error!("Unable to parse the webhook endpoint: {e}");
                "Webhook endpoint is invalid".to_string()
            })?,
            operator.clone(),
            config.webhook().authorization_token().clone(),
        );
        let form_collection = FormCollectionClient::new(
            http_client,
            config.form_collection().url().map_err(|e| {
                tracing::error!("Unable to parse the form collection endpoint: {e}");
                "Form collection endpoint is invalid".to_string()
            })?,
        );

        Ok(Self::new(form_relay, webhook, form_collection, operator))
    }
}
