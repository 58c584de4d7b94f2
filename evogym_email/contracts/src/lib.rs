use std::future::Future;

use evogym_models::contact::ContactSubmission;
use thiserror::Error;

/// Forwards validated contact submissions to the email provider.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailGatewayService: Send + Sync + 'static {
    /// Issue exactly one send request for `submission`. Implementations must
    /// not retry.
    fn send(
        &self,
        submission: ContactSubmission,
    ) -> impl Future<Output = Result<(), EmailSendError>> + Send;
}

#[derive(Debug, Error)]
pub enum EmailSendError {
    #[error(transparent)]
    Delivery(#[from] EmailDeliveryFailure),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The provider did not accept the email. The original cause has already been
/// logged by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Falha ao enviar email. Por favor, tente novamente.")]
pub struct EmailDeliveryFailure;

#[cfg(feature = "mock")]
impl MockEmailGatewayService {
    pub fn with_send(
        mut self,
        submission: ContactSubmission,
        result: Result<(), EmailDeliveryFailure>,
    ) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(move |_| Box::pin(std::future::ready(result.map_err(Into::into))));
        self
    }
}
