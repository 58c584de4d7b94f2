use std::sync::{LazyLock, OnceLock};

use anyhow::bail;
use evogym_models::contact::ContactSubmission;
use evogym_utils::evogym_version;
use serde::Serialize;
use tracing::info;
use url::Url;

static USER_AGENT: LazyLock<String> = LazyLock::new(|| {
    let homepage = env!("CARGO_PKG_HOMEPAGE");
    let version = evogym_version();

    format!("Evogym Contact ({homepage}, Version {version})")
});

static CLIENT: OnceLock<EmailJsClient> = OnceLock::new();

/// The process-wide EmailJS client.
///
/// EmailJS binds a client to the account's public key. The client is created
/// on first use and shared by every gateway afterwards.
#[derive(Debug)]
pub struct EmailJsClient {
    http: reqwest::Client,
    public_key: String,
}

impl EmailJsClient {
    /// Returns the process-wide client, creating it with `public_key` if this
    /// is the first call. Later calls return the same client and ignore their
    /// argument.
    pub fn get_or_init(public_key: &str) -> &'static Self {
        CLIENT.get_or_init(|| {
            info!("Initializing EmailJS client");
            Self {
                http: reqwest::Client::builder()
                    .user_agent(&*USER_AGENT)
                    .build()
                    .unwrap(),
                public_key: public_key.into(),
            }
        })
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Post one send request. Any transport error or non-success status is
    /// returned as an error carrying the provider's response text.
    pub(crate) async fn send(
        &self,
        endpoint: &Url,
        request: &SendRequest<'_>,
    ) -> anyhow::Result<()> {
        let response = self
            .http
            .post(endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("EmailJS responded with {status}: {text}");
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SendRequest<'a> {
    pub service_id: &'a str,
    pub template_id: &'a str,
    pub user_id: &'a str,
    pub template_params: TemplateParams<'a>,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    pub access_token: Option<&'a str>,
}

/// Variables of the contact email template: `{{name}}`, `{{from_name}}`,
/// `{{email}}` and `{{message}}`.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub(crate) struct TemplateParams<'a> {
    pub name: &'a str,
    pub from_name: &'a str,
    pub email: &'a str,
    pub message: &'a str,
}

impl<'a> From<&'a ContactSubmission> for TemplateParams<'a> {
    fn from(value: &'a ContactSubmission) -> Self {
        Self {
            name: &value.name,
            from_name: &value.name,
            email: &value.email,
            message: &value.message,
        }
    }
}
