use std::{net::IpAddr, sync::Arc};

use anyhow::Context;
use axum::{http::HeaderValue, Router};
use evogym_core_contact_contracts::ContactFeatureService;
use tokio::net::TcpListener;
use tracing::info;

pub use crate::middlewares::{RequestId, REQUEST_ID_HEADER};

mod errors;
mod extractors;
mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Contact> {
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub host: IpAddr,
    pub port: u16,
    allowed_origins: Arc<[HeaderValue]>,
}

impl RestServerConfig {
    pub fn new(host: IpAddr, port: u16, allowed_origins: &[String]) -> anyhow::Result<Self> {
        let allowed_origins: Arc<[HeaderValue]> = allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid allowed origin: {origin:?}"))
            })
            .collect::<anyhow::Result<_>>()?;

        Ok(Self {
            host,
            port,
            allowed_origins,
        })
    }

    pub fn allowed_origins(&self) -> &[HeaderValue] {
        &self.allowed_origins
    }
}

impl<Contact> RestServer<Contact>
where
    Contact: ContactFeatureService,
{
    pub fn new(contact: Contact, config: RestServerConfig) -> Self {
        Self { contact, config }
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let (host, port) = (self.config.host, self.config.port);
        let listener = TcpListener::bind((host, port))
            .await
            .with_context(|| format!("Failed to bind to {host}:{port}"))?;
        info!("Starting http server on {host}:{port}");
        axum::serve(listener, self.router())
            .await
            .context("Failed to start HTTP server")
    }

    fn router(self) -> Router<()> {
        let router = Router::new().merge(routes::contact::router(Arc::new(self.contact)));
        middlewares::add(router, &self.config.allowed_origins)
    }
}
