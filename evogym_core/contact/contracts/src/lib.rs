use std::future::Future;

use evogym_models::contact::{ContactFormErrors, ContactFormInput};
use thiserror::Error;

/// Handles contact form submissions where every call is its own form
/// instance.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Validate and send the form. Returns the confirmation message shown to
    /// the visitor.
    fn send_message(
        &self,
        input: ContactFormInput,
    ) -> impl Future<Output = Result<String, ContactSubmitError>> + Send;
}

/// Status of a contact form as shown to the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Success {
        message: String,
    },
    Error {
        message: String,
    },
}

impl SubmissionStatus {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    /// The message attached to a terminal status.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Idle | Self::Submitting => None,
            Self::Success { message } | Self::Error { message } => Some(message),
        }
    }
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error("A submission is already in progress.")]
    Busy,
    #[error("The contact form contains invalid fields.")]
    Invalid(ContactFormErrors),
    #[error("{0}")]
    Delivery(String),
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_send_message(
        mut self,
        input: ContactFormInput,
        result: Result<String, ContactSubmitError>,
    ) -> Self {
        self.expect_send_message()
            .once()
            .with(mockall::predicate::eq(input))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message() {
        assert_eq!(SubmissionStatus::Idle.message(), None);
        assert_eq!(SubmissionStatus::Submitting.message(), None);
        assert_eq!(
            SubmissionStatus::Success {
                message: "sent".into()
            }
            .message(),
            Some("sent")
        );
        assert_eq!(
            SubmissionStatus::Error {
                message: "failed".into()
            }
            .message(),
            Some("failed")
        );
    }
}
