use std::sync::Arc;

use anyhow::bail;
use evogym_api_rest::RestServerConfig;
use evogym_config::Config;
use evogym_core_contact_impl::ContactFeatureConfig;
use evogym_email_emailjs::{EmailJsCredentials, EmailJsGatewayConfig};
use tracing::warn;
use types::{Contact, ContactForm, Email, RestServer};

pub mod types;

/// Holds the service configs derived from the application config.
#[derive(Debug, Clone)]
pub struct ConfigProvider {
    pub rest_server_config: RestServerConfig,
    pub emailjs_gateway_config: EmailJsGatewayConfig,
    pub contact_feature_config: ContactFeatureConfig,
}

impl ConfigProvider {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        // API
        let rest_server_config = RestServerConfig::new(
            config.http.host,
            config.http.port,
            &config.http.allowed_origins,
        )?;

        // Email
        let emailjs = &config.emailjs;
        let emailjs_gateway_config = EmailJsGatewayConfig::new(
            EmailJsCredentials {
                public_key: emailjs.public_key.clone(),
                service_id: emailjs.service_id.clone(),
                template_id: emailjs.template_id.clone(),
                private_key: emailjs.private_key.clone(),
            },
            emailjs.endpoint_override.clone(),
        );

        let placeholders = emailjs_gateway_config.placeholders();
        if !placeholders.is_empty() {
            let missing = placeholders.join(", ");
            if emailjs.require_credentials {
                bail!("Missing EmailJS credentials: {missing}");
            }
            warn!(
                "EmailJS credentials missing, using placeholders for {missing}. Contact messages \
                 will not be delivered."
            );
        }

        // Core
        let contact_feature_config = ContactFeatureConfig {
            success_message: config.contact.success_message.as_str().into(),
            fallback_error_message: config.contact.fallback_error_message.as_str().into(),
        };

        Ok(Self {
            rest_server_config,
            emailjs_gateway_config,
            contact_feature_config,
        })
    }
}

/// Wires the services together.
#[derive(Debug, Clone)]
pub struct Provider {
    config: ConfigProvider,
    email: Arc<Email>,
}

impl Provider {
    pub fn new(config: ConfigProvider) -> Self {
        let email = Email::new(config.emailjs_gateway_config.clone()).into();
        Self { config, email }
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn contact(&self) -> Contact {
        Contact::new(
            Arc::clone(&self.email),
            self.config.contact_feature_config.clone(),
        )
    }

    pub fn contact_form(&self) -> ContactForm {
        ContactForm::new(
            Arc::clone(&self.email),
            self.config.contact_feature_config.clone(),
        )
    }

    pub fn rest_server(&self) -> RestServer {
        RestServer::new(self.contact(), self.config.rest_server_config.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use evogym_config::DEFAULT_CONFIG_PATH;
    use pretty_assertions::assert_eq;

    use super::*;

    fn load(overrides: &[&str]) -> Config {
        evogym_config::load_with_override(&[Path::new(DEFAULT_CONFIG_PATH)], overrides).unwrap()
    }

    #[test]
    fn default_config_uses_placeholders() {
        let config = load(&[]);

        let provider = ConfigProvider::new(&config).unwrap();

        assert_eq!(
            provider.emailjs_gateway_config.placeholders(),
            ["public_key", "service_id", "template_id"]
        );
        assert_eq!(
            &*provider.contact_feature_config.success_message,
            "Mensagem enviada com sucesso! Entraremos em contato em breve."
        );
    }

    #[test]
    fn complete_credentials() {
        let config = load(&[
            r#"emailjs.public_key = "pk""#,
            r#"emailjs.service_id = "service""#,
            r#"emailjs.template_id = "template""#,
            "emailjs.require_credentials = true",
        ]);

        let provider = ConfigProvider::new(&config).unwrap();

        assert!(provider.emailjs_gateway_config.placeholders().is_empty());
    }

    #[test]
    fn required_credentials_missing() {
        let config = load(&[
            r#"emailjs.public_key = "pk""#,
            "emailjs.require_credentials = true",
        ]);

        let err = ConfigProvider::new(&config).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Missing EmailJS credentials: service_id, template_id"
        );
    }

    #[test]
    fn invalid_allowed_origin() {
        let config = load(&[r#"http.allowed_origins = ["bad\norigin"]"#]);

        let result = ConfigProvider::new(&config);

        assert!(result.is_err());
    }
}
