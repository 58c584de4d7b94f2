use std::{
    collections::BTreeMap,
    net::{IpAddr, Ipv4Addr},
    sync::{Arc, Mutex},
};

use anyhow::Context;
use axum::{extract::State, http::StatusCode, routing, Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::info;
use url::Url;

pub const SEND_ROUTE: &str = "/api/v1.0/email/send";

/// The account the fake server accepts requests for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailJsAccount {
    pub public_key: String,
    pub service_id: String,
    pub template_id: String,
    pub private_key: Option<String>,
}

impl Default for EmailJsAccount {
    fn default() -> Self {
        Self {
            public_key: "test-public-key".into(),
            service_id: "test-service".into(),
            template_id: "test-template".into(),
            private_key: None,
        }
    }
}

/// An email accepted by the fake server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedEmail {
    pub service_id: String,
    pub template_id: String,
    pub template_params: BTreeMap<String, String>,
}

pub async fn start_server(
    host: IpAddr,
    port: u16,
    account: EmailJsAccount,
) -> anyhow::Result<()> {
    info!("Starting EmailJS testing server on {host}:{port}");
    info!("Send endpoint: http://{host}:{port}{SEND_ROUTE}");
    info!("Public key: {:?}", account.public_key);
    info!("Service ID: {:?}", account.service_id);
    info!("Template ID: {:?}", account.template_id);
    if let Some(private_key) = &account.private_key {
        info!("Access token: {private_key:?}");
    }

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router(state(account)))
        .await
        .context("Failed to start HTTP server")
}

/// A fake EmailJS server running in the background of the current tokio
/// runtime.
#[derive(Debug)]
pub struct FakeEmailJs {
    endpoint: Url,
    state: Arc<ServerState>,
}

impl FakeEmailJs {
    /// Start the server on an ephemeral port of the loopback interface.
    pub async fn spawn(account: EmailJsAccount) -> anyhow::Result<Self> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .context("Failed to bind fake EmailJS server")?;
        let addr = listener.local_addr()?;

        let state = state(account);
        let router = router(Arc::clone(&state));
        tokio::spawn(async move { axum::serve(listener, router).await });

        Ok(Self {
            endpoint: format!("http://{addr}{SEND_ROUTE}").parse()?,
            state,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// All emails accepted so far, oldest first.
    pub fn received(&self) -> Vec<ReceivedEmail> {
        self.state.received.lock().unwrap().clone()
    }

    /// Number of send requests, accepted or not.
    pub fn requests(&self) -> usize {
        *self.state.requests.lock().unwrap()
    }
}

#[derive(Debug)]
struct ServerState {
    account: EmailJsAccount,
    received: Mutex<Vec<ReceivedEmail>>,
    requests: Mutex<usize>,
}

fn state(account: EmailJsAccount) -> Arc<ServerState> {
    Arc::new(ServerState {
        account,
        received: Default::default(),
        requests: Default::default(),
    })
}

fn router(state: Arc<ServerState>) -> Router<()> {
    Router::new()
        .route(SEND_ROUTE, routing::post(send))
        .with_state(state)
}

#[derive(Deserialize)]
struct SendRequest {
    service_id: String,
    template_id: String,
    user_id: String,
    #[serde(default)]
    template_params: BTreeMap<String, String>,
    #[serde(rename = "accessToken")]
    access_token: Option<String>,
}

async fn send(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<SendRequest>,
) -> (StatusCode, &'static str) {
    *state.requests.lock().unwrap() += 1;
    let account = &state.account;

    if request.user_id != account.public_key {
        return (
            StatusCode::BAD_REQUEST,
            "The Public Key is invalid. To find this ID, visit \
             https://dashboard.emailjs.com/admin/account",
        );
    }

    if let Some(private_key) = &account.private_key {
        if request.access_token.as_ref() != Some(private_key) {
            return (StatusCode::FORBIDDEN, "The access token is invalid");
        }
    }

    if request.service_id != account.service_id {
        return (
            StatusCode::BAD_REQUEST,
            "The service ID is invalid. To find this ID, visit \
             https://dashboard.emailjs.com/admin",
        );
    }

    if request.template_id != account.template_id {
        return (
            StatusCode::BAD_REQUEST,
            "The template ID not found. To find this ID, visit \
             https://dashboard.emailjs.com/admin/templates",
        );
    }

    info!(params = ?request.template_params, "Accepted email");
    state.received.lock().unwrap().push(ReceivedEmail {
        service_id: request.service_id,
        template_id: request.template_id,
        template_params: request.template_params,
    });

    (StatusCode::OK, "OK")
}
