use std::sync::Arc;

use evogym_core_contact_contracts::{ContactSubmitError, SubmissionStatus};
use evogym_email_contracts::{EmailGatewayService, EmailSendError};
use evogym_models::contact::ContactFormInput;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::ContactFeatureConfig;

/// One contact form instance.
///
/// Owns the submission status and the current field values, both of which
/// can be observed by the presentation layer. At most one submission is in
/// flight at any time.
#[derive(Debug)]
pub struct ContactForm<Gateway> {
    gateway: Arc<Gateway>,
    config: ContactFeatureConfig,
    status: watch::Sender<SubmissionStatus>,
    fields: watch::Sender<ContactFormInput>,
}

impl<Gateway> ContactForm<Gateway>
where
    Gateway: EmailGatewayService,
{
    pub fn new(gateway: Arc<Gateway>, config: ContactFeatureConfig) -> Self {
        Self {
            gateway,
            config,
            status: watch::Sender::new(SubmissionStatus::Idle),
            fields: watch::Sender::new(ContactFormInput::default()),
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionStatus> {
        self.status.subscribe()
    }

    pub fn fields(&self) -> ContactFormInput {
        self.fields.borrow().clone()
    }

    pub fn subscribe_fields(&self) -> watch::Receiver<ContactFormInput> {
        self.fields.subscribe()
    }

    /// Validate `input` and, if every field is valid, send it through the
    /// gateway.
    ///
    /// Invalid input is kept as the current field values and leaves the status
    /// untouched. A successful send resets the fields, a failed one keeps them
    /// so the visitor can retry. Dropping the future while it waits for the
    /// gateway restores the status the form had before.
    pub async fn submit(&self, input: ContactFormInput) -> Result<(), ContactSubmitError> {
        if self.status.borrow().is_submitting() {
            return Err(ContactSubmitError::Busy);
        }

        let submission = match input.validate() {
            Ok(submission) => submission,
            Err(errors) => {
                debug!(?errors, "Rejected invalid contact form");
                self.fields.send_replace(input);
                return Err(ContactSubmitError::Invalid(errors));
            }
        };

        let mut previous = None;
        self.status.send_if_modified(|status| {
            if status.is_submitting() {
                return false;
            }
            previous = Some(std::mem::replace(status, SubmissionStatus::Submitting));
            true
        });
        let Some(previous) = previous else {
            return Err(ContactSubmitError::Busy);
        };
        let guard = SubmittingGuard {
            status: &self.status,
            previous: Some(previous),
        };
        self.fields.send_replace(input);

        info!("Sending contact message");
        match self.gateway.send(submission).await {
            Ok(()) => {
                info!("Contact message sent");
                self.fields.send_replace(ContactFormInput::default());
                guard.finish(SubmissionStatus::Success {
                    message: self.config.success_message.to_string(),
                });
                Ok(())
            }
            Err(err) => {
                let message = match err {
                    EmailSendError::Delivery(failure) => failure.to_string(),
                    EmailSendError::Other(err) => {
                        error!("Failed to send contact message: {err:#}");
                        String::new()
                    }
                };
                let message = if message.is_empty() {
                    self.config.fallback_error_message.to_string()
                } else {
                    message
                };

                guard.finish(SubmissionStatus::Error {
                    message: message.clone(),
                });
                Err(ContactSubmitError::Delivery(message))
            }
        }
    }
}

/// Leaves `Submitting` when a submission is dropped before the gateway
/// answered, so the form does not stay busy forever.
struct SubmittingGuard<'a> {
    status: &'a watch::Sender<SubmissionStatus>,
    previous: Option<SubmissionStatus>,
}

impl SubmittingGuard<'_> {
    fn finish(mut self, status: SubmissionStatus) {
        self.previous = None;
        self.status.send_replace(status);
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            debug!("Contact submission cancelled");
            self.status.send_replace(previous);
        }
    }
}

#[cfg(test)]
mod tests {
    use evogym_email_contracts::{EmailDeliveryFailure, MockEmailGatewayService};
    use evogym_models::contact::{ContactFieldError, ContactFormErrors};
    use evogym_utils::assert_matches;
    use pretty_assertions::assert_eq;
    use tokio::sync::oneshot;

    use super::*;

    fn config() -> ContactFeatureConfig {
        ContactFeatureConfig {
            success_message: "Mensagem enviada com sucesso! Entraremos em contato em breve.".into(),
            fallback_error_message: "Erro ao enviar mensagem. Por favor, tente novamente.".into(),
        }
    }

    fn input() -> ContactFormInput {
        ContactFormInput {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            message: "Hi".into(),
        }
    }

    fn make_sut(gateway: MockEmailGatewayService) -> ContactForm<MockEmailGatewayService> {
        ContactForm::new(gateway.into(), config())
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let gateway =
            MockEmailGatewayService::new().with_send(input().validate().unwrap(), Ok(()));
        let sut = make_sut(gateway);

        // Act
        let result = sut.submit(input()).await;

        // Assert
        result.unwrap();
        assert_eq!(
            sut.status(),
            SubmissionStatus::Success {
                message: "Mensagem enviada com sucesso! Entraremos em contato em breve.".into()
            }
        );
        assert_eq!(sut.fields(), ContactFormInput::default());
    }

    #[tokio::test]
    async fn invalid() {
        // Arrange
        let gateway = MockEmailGatewayService::new();
        let sut = make_sut(gateway);
        let input = ContactFormInput {
            name: String::new(),
            email: "x@x.com".into(),
            message: "hi".into(),
        };

        // Act
        let result = sut.submit(input.clone()).await;

        // Assert
        assert_matches!(
            result,
            Err(ContactSubmitError::Invalid(ContactFormErrors {
                name: Some(ContactFieldError::RequiredField),
                email: None,
                message: None,
            }))
        );
        assert_eq!(sut.status(), SubmissionStatus::Idle);
        assert_eq!(sut.fields(), input);
    }

    #[tokio::test]
    async fn invalid_email() {
        // Arrange
        let gateway = MockEmailGatewayService::new();
        let sut = make_sut(gateway);
        let input = ContactFormInput {
            email: "not-an-email".into(),
            ..input()
        };

        // Act
        let result = sut.submit(input).await;

        // Assert
        assert_matches!(
            result,
            Err(ContactSubmitError::Invalid(ContactFormErrors {
                email: Some(ContactFieldError::PatternMismatch),
                ..
            }))
        );
    }

    #[tokio::test]
    async fn delivery_failure() {
        // Arrange
        let gateway = MockEmailGatewayService::new()
            .with_send(input().validate().unwrap(), Err(EmailDeliveryFailure));
        let sut = make_sut(gateway);

        // Act
        let result = sut.submit(input()).await;

        // Assert
        let expected = "Falha ao enviar email. Por favor, tente novamente.";
        assert_matches!(result, Err(ContactSubmitError::Delivery(m)) if m == expected);
        assert_eq!(
            sut.status(),
            SubmissionStatus::Error {
                message: expected.into()
            }
        );
        assert_eq!(sut.fields(), input());
    }

    #[tokio::test]
    async fn other_failure_uses_fallback_message() {
        // Arrange
        let mut gateway = MockEmailGatewayService::new();
        gateway.expect_send().once().return_once(|_| {
            Box::pin(std::future::ready(Err(EmailSendError::Other(
                anyhow::anyhow!("connection reset"),
            ))))
        });
        let sut = make_sut(gateway);

        // Act
        let result = sut.submit(input()).await;

        // Assert
        let expected = "Erro ao enviar mensagem. Por favor, tente novamente.";
        assert_matches!(result, Err(ContactSubmitError::Delivery(m)) if m == expected);
        assert_eq!(sut.status().message(), Some(expected));
        assert_eq!(sut.fields(), input());
    }

    #[tokio::test]
    async fn retry_after_failure() {
        // Arrange
        let submission = input().validate().unwrap();
        let mut gateway = MockEmailGatewayService::new();
        let mut seq = mockall::Sequence::new();
        gateway
            .expect_send()
            .once()
            .in_sequence(&mut seq)
            .return_once(|_| Box::pin(std::future::ready(Err(EmailDeliveryFailure.into()))));
        gateway
            .expect_send()
            .once()
            .in_sequence(&mut seq)
            .with(mockall::predicate::eq(submission))
            .return_once(|_| Box::pin(std::future::ready(Ok(()))));
        let sut = make_sut(gateway);

        // Act
        sut.submit(input()).await.unwrap_err();
        let result = sut.submit(sut.fields()).await;

        // Assert
        result.unwrap();
        assert_matches!(sut.status(), SubmissionStatus::Success { .. });
        assert_eq!(sut.fields(), ContactFormInput::default());
    }

    #[tokio::test]
    async fn busy_while_submitting() {
        // Arrange
        let (release, released) = oneshot::channel::<()>();
        let mut gateway = MockEmailGatewayService::new();
        gateway.expect_send().once().return_once(move |_| {
            Box::pin(async move {
                released.await.ok();
                Ok(())
            })
        });
        let sut = Arc::new(make_sut(gateway));
        let mut status = sut.subscribe();

        // Act
        let first = tokio::spawn({
            let sut = Arc::clone(&sut);
            async move { sut.submit(input()).await }
        });
        status
            .wait_for(SubmissionStatus::is_submitting)
            .await
            .unwrap();
        let second = sut.submit(input()).await;
        let invalid_while_busy = sut.submit(ContactFormInput::default()).await;
        release.send(()).unwrap();
        let first = first.await.unwrap();

        // Assert
        assert_matches!(second, Err(ContactSubmitError::Busy));
        assert_matches!(invalid_while_busy, Err(ContactSubmitError::Busy));
        first.unwrap();
        assert_matches!(sut.status(), SubmissionStatus::Success { .. });
    }

    #[tokio::test]
    async fn dropped_submission_releases_form() {
        // Arrange
        let mut gateway = MockEmailGatewayService::new();
        let mut seq = mockall::Sequence::new();
        gateway
            .expect_send()
            .once()
            .in_sequence(&mut seq)
            .return_once(|_| {
                Box::pin(std::future::pending::<Result<(), EmailSendError>>())
            });
        gateway
            .expect_send()
            .once()
            .in_sequence(&mut seq)
            .return_once(|_| Box::pin(std::future::ready(Ok(()))));
        let sut = make_sut(gateway);

        // Act
        {
            let submit = sut.submit(input());
            tokio::pin!(submit);
            tokio::select! {
                biased;
                _ = &mut submit => panic!("gateway never answers"),
                () = std::future::ready(()) => {}
            }
            assert_eq!(sut.status(), SubmissionStatus::Submitting);
        }
        let status_after_drop = sut.status();
        let result = sut.submit(input()).await;

        // Assert
        assert_eq!(status_after_drop, SubmissionStatus::Idle);
        result.unwrap();
        assert_matches!(sut.status(), SubmissionStatus::Success { .. });
    }

    #[tokio::test]
    async fn fields_observable() {
        // Arrange
        let gateway =
            MockEmailGatewayService::new().with_send(input().validate().unwrap(), Ok(()));
        let sut = make_sut(gateway);
        let mut fields = sut.subscribe_fields();

        // Act
        sut.submit(input()).await.unwrap();

        // Assert
        assert!(fields.has_changed().unwrap());
        assert_eq!(*fields.borrow_and_update(), ContactFormInput::default());
    }
}
