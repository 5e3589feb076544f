use std::time::Duration;

use config::{Config, File, FileFormat};
use derive_getters::Getters;
use reqwest::Url;
use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::domain::ContactEmail;

/// Retrive the configuration for the application.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    Config::builder()
        .add_source(File::new("configuration.yaml", FileFormat::Yaml))
        .build()?
        .try_deserialize()
}

#[derive(Debug, serde::Deserialize, Getters)]
pub struct Settings {
    application: ApplicationSettings,
    delivery: DeliverySettings,
}

#[derive(Debug, serde::Deserialize, Getters)]
pub struct ApplicationSettings {
    host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Settings for the delivery chain: the operator every channel notifies, a
/// shared request timeout and one endpoint per channel.
#[derive(Debug, serde::Deserialize, Getters)]
pub struct DeliverySettings {
    operator_email: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    request_timeout_ms: u64,
    form_relay: FormRelaySettings,
    webhook: WebhookSettings,
    form_collection: FormCollectionSettings,
}

impl DeliverySettings {
    pub fn operator(&self) -> Result<ContactEmail, String> {
        ContactEmail::parse(self.operator_email.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, serde::Deserialize, Getters)]
pub struct FormRelaySettings {
    endpoint: String,
}

impl FormRelaySettings {
    pub fn url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.endpoint)
    }
}

#[derive(Debug, serde::Deserialize, Getters)]
pub struct WebhookSettings {
    endpoint: String,
    authorization_token: Secret<String>,
}

impl WebhookSettings {
    pub fn url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.endpoint)
    }
}

#[derive(Debug, serde::Deserialize, Getters)]
pub struct FormCollectionSettings {
    endpoint: String,
}

impl FormCollectionSettings {
    pub fn url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.endpoint)
    }
}
