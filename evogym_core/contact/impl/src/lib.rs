use std::sync::Arc;

use evogym_core_contact_contracts::{ContactFeatureService, ContactSubmitError};
use evogym_email_contracts::EmailGatewayService;
use evogym_models::contact::ContactFormInput;

pub use crate::form::ContactForm;

mod form;

#[derive(Debug)]
pub struct ContactFeatureServiceImpl<Gateway> {
    gateway: Arc<Gateway>,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// Shown after the message has been sent.
    pub success_message: Arc<str>,
    /// Shown when sending failed without a more specific message.
    pub fallback_error_message: Arc<str>,
}

impl<Gateway> ContactFeatureServiceImpl<Gateway> {
    pub fn new(gateway: Arc<Gateway>, config: ContactFeatureConfig) -> Self {
        Self { gateway, config }
    }
}

impl<Gateway> ContactFeatureService for ContactFeatureServiceImpl<Gateway>
where
    Gateway: EmailGatewayService,
{
    async fn send_message(&self, input: ContactFormInput) -> Result<String, ContactSubmitError> {
        let form = ContactForm::new(Arc::clone(&self.gateway), self.config.clone());
        form.submit(input).await?;
        Ok(self.config.success_message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use evogym_email_contracts::{EmailDeliveryFailure, MockEmailGatewayService};
    use evogym_utils::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    fn make_sut(
        gateway: MockEmailGatewayService,
    ) -> ContactFeatureServiceImpl<MockEmailGatewayService> {
        ContactFeatureServiceImpl::new(
            gateway.into(),
            ContactFeatureConfig {
                success_message: "sent".into(),
                fallback_error_message: "failed".into(),
            },
        )
    }

    fn input() -> ContactFormInput {
        ContactFormInput {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            message: "Hi".into(),
        }
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let gateway =
            MockEmailGatewayService::new().with_send(input().validate().unwrap(), Ok(()));
        let sut = make_sut(gateway);

        // Act
        let result = sut.send_message(input()).await;

        // Assert
        assert_eq!(result.unwrap(), "sent");
    }

    #[tokio::test]
    async fn invalid() {
        // Arrange
        let sut = make_sut(MockEmailGatewayService::new());

        // Act
        let result = sut.send_message(ContactFormInput::default()).await;

        // Assert
        assert_matches!(
            result,
            Err(ContactSubmitError::Invalid(errors)) if errors.iter().count() == 3
        );
    }

    #[tokio::test]
    async fn delivery_failure() {
        // Arrange
        let gateway = MockEmailGatewayService::new()
            .with_send(input().validate().unwrap(), Err(EmailDeliveryFailure));
        let sut = make_sut(gateway);

        // Act
        let result = sut.send_message(input()).await;

        // Assert
        assert_matches!(result, Err(ContactSubmitError::Delivery(_)));
    }

    #[tokio::test]
    async fn requests_are_independent() {
        // Arrange
        let mut gateway = MockEmailGatewayService::new();
        gateway
            .expect_send()
            .times(2)
            .returning(|_| Box::pin(std::future::ready(Ok(()))));
        let sut = make_sut(gateway);

        // Act
        let (first, second) =
            tokio::join!(sut.send_message(input()), sut.send_message(input()));

        // Assert
        first.unwrap();
        second.unwrap();
    }
}
