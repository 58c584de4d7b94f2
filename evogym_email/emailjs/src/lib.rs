use std::sync::Arc;

use evogym_email_contracts::{EmailDeliveryFailure, EmailGatewayService, EmailSendError};
use evogym_models::contact::ContactSubmission;
use tracing::{debug, error, warn};
use url::Url;

pub use crate::client::EmailJsClient;
use crate::client::{SendRequest, TemplateParams};

mod client;

pub const SEND_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

pub const PLACEHOLDER_PUBLIC_KEY: &str = "YOUR_PUBLIC_KEY";
pub const PLACEHOLDER_SERVICE_ID: &str = "YOUR_SERVICE_ID";
pub const PLACEHOLDER_TEMPLATE_ID: &str = "YOUR_TEMPLATE_ID";

/// Sends contact submissions through the EmailJS REST API.
#[derive(Debug, Clone)]
pub struct EmailJsGateway {
    config: EmailJsGatewayConfig,
}

#[derive(Debug, Clone)]
pub struct EmailJsGatewayConfig {
    public_key: Arc<str>,
    service_id: Arc<str>,
    template_id: Arc<str>,
    private_key: Option<Arc<str>>,
    endpoint: Arc<Url>,
    placeholders: Arc<[&'static str]>,
}

/// EmailJS account credentials as found in the configuration.
#[derive(Debug, Clone, Default)]
pub struct EmailJsCredentials {
    pub public_key: Option<String>,
    pub service_id: Option<String>,
    pub template_id: Option<String>,
    pub private_key: Option<String>,
}

impl EmailJsGatewayConfig {
    /// Missing or empty credentials are replaced by placeholder values. The
    /// provider rejects those at request time.
    pub fn new(credentials: EmailJsCredentials, endpoint_override: Option<Url>) -> Self {
        let mut placeholders = Vec::new();
        let mut resolve = |value: Option<String>, key: &'static str, placeholder: &str| {
            value.filter(|v| !v.is_empty()).unwrap_or_else(|| {
                placeholders.push(key);
                placeholder.into()
            })
        };

        let public_key = resolve(credentials.public_key, "public_key", PLACEHOLDER_PUBLIC_KEY);
        let service_id = resolve(credentials.service_id, "service_id", PLACEHOLDER_SERVICE_ID);
        let template_id = resolve(
            credentials.template_id,
            "template_id",
            PLACEHOLDER_TEMPLATE_ID,
        );

        Self {
            public_key: public_key.into(),
            service_id: service_id.into(),
            template_id: template_id.into(),
            private_key: credentials
                .private_key
                .filter(|k| !k.is_empty())
                .map(Into::into),
            endpoint: endpoint_override
                .unwrap_or_else(|| SEND_ENDPOINT.parse().unwrap())
                .into(),
            placeholders: placeholders.into(),
        }
    }

    /// Names of the credentials that fell back to placeholder values.
    pub fn placeholders(&self) -> &[&'static str] {
        &self.placeholders
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl EmailJsGateway {
    pub fn new(config: EmailJsGatewayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmailJsGatewayConfig {
        &self.config
    }

    /// Returns the process-wide EmailJS client, initializing it on the first
    /// call. Safe to call any number of times.
    pub fn setup(&self) -> &'static EmailJsClient {
        let client = EmailJsClient::get_or_init(&self.config.public_key);
        if client.public_key() != &*self.config.public_key {
            warn!("EmailJS client is already initialized with a different public key");
        }
        client
    }
}

impl EmailGatewayService for EmailJsGateway {
    async fn send(&self, submission: ContactSubmission) -> Result<(), EmailSendError> {
        let client = self.setup();

        let request = SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: client.public_key(),
            template_params: TemplateParams::from(&submission),
            access_token: self.config.private_key.as_deref(),
        };

        match client.send(&self.config.endpoint, &request).await {
            Ok(()) => {
                debug!("Contact email sent");
                Ok(())
            }
            Err(err) => {
                error!("Failed to send contact email: {err:#}");
                Err(EmailDeliveryFailure.into())
            }
        }
    }
}
