use std::collections::BTreeMap;

use evogym_models::contact::{ContactFormErrors, ContactFormInput};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ApiContactForm {
    /// Name of the visitor
    #[serde(default)]
    pub name: String,
    /// Email address the gym should reply to
    #[serde(default)]
    pub email: String,
    /// The message itself
    #[serde(default)]
    pub message: String,
}

impl From<ApiContactForm> for ContactFormInput {
    fn from(value: ApiContactForm) -> Self {
        Self {
            name: value.name,
            email: value.email,
            message: value.message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiContactSent {
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ApiInvalidContactForm {
    pub detail: &'static str,
    pub fields: BTreeMap<&'static str, ApiFieldError>,
}

#[derive(Debug, Serialize)]
pub struct ApiFieldError {
    pub code: &'static str,
    pub message: String,
}

impl From<ContactFormErrors> for ApiInvalidContactForm {
    fn from(value: ContactFormErrors) -> Self {
        Self {
            detail: "Invalid contact form",
            fields: value
                .iter()
                .map(|(field, err)| {
                    let err = ApiFieldError {
                        code: err.code(),
                        message: err.describe(field),
                    };
                    (field.as_str(), err)
                })
                .collect(),
        }
    }
}
