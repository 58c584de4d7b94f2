use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use evogym_core_contact_contracts::{ContactFeatureService, ContactSubmitError};

use crate::{
    errors::error,
    extractors::JsonBody,
    models::{ApiContactForm, ApiContactSent, ApiInvalidContactForm},
};

pub const PATH: &str = "/contact";

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route(PATH, routing::post(send_message))
        .with_state(service)
}

async fn send_message(
    service: State<Arc<impl ContactFeatureService>>,
    JsonBody(form): JsonBody<ApiContactForm>,
) -> Response {
    match service.send_message(form.into()).await {
        Ok(message) => Json(ApiContactSent {
            status: "success",
            message,
        })
        .into_response(),
        Err(ContactSubmitError::Invalid(errors)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiInvalidContactForm::from(errors)),
        )
            .into_response(),
        Err(ContactSubmitError::Delivery(message)) => error(StatusCode::BAD_GATEWAY, message),
        Err(ContactSubmitError::Busy) => {
            error(StatusCode::CONFLICT, "Submission already in progress")
        }
    }
}
