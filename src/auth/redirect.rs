/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1::PhotosError;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use url::Url;

const STATE_QUERY_KEY: &str = "state";
const CODE_QUERY_KEY: &str = "code";
const ERROR_QUERY_KEY: &str = "error";

// Either the authorization code or the reason the provider gave for not issuing one
type Callback = Result<String, String>;

struct RedirectState {
    expected_state: String,
    callback_tx: Mutex<Option<oneshot::Sender<Callback>>>,
}

/// Local listener that captures the single redirect ending the browser login
pub(crate) struct RedirectListener {
    local_addr: SocketAddr,
    callback_rx: oneshot::Receiver<Callback>,
    shutdown_tx: oneshot::Sender<()>,
    server: JoinHandle<std::io::Result<()>>,
}

impl RedirectListener {
    /// Binds to the host and port of `redirect_url` and serves its path
    pub(crate) async fn bind(
        redirect_url: &Url,
        expected_state: String,
    ) -> Result<Self, PhotosError> {
        let host = redirect_url.host_str().ok_or_else(|| {
            PhotosError::InvalidRequest(format!("redirect url has no host: {redirect_url}"))
        })?;
        let port = redirect_url.port_or_known_default().ok_or_else(|| {
            PhotosError::InvalidRequest(format!("redirect url has no port: {redirect_url}"))
        })?;

        let listener = TcpListener::bind((host, port)).await?;
        let local_addr = listener.local_addr()?;

        let (callback_tx, callback_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let state = Arc::new(RedirectState {
            expected_state,
            callback_tx: Mutex::new(Some(callback_tx)),
        });
        let app = Router::new()
            .route(redirect_url.path(), get(capture_redirect))
            .with_state(state);

        info!("starting redirect listener on {local_addr}");
        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        Ok(Self {
            local_addr,
            callback_rx,
            shutdown_tx,
            server,
        })
    }

    /// Waits for the redirect carrying the authorization code, then shuts the listener down.
    ///
    /// A listener that stops serving before a code arrives ends the login.
    pub(crate) async fn wait_for_code(self) -> Result<String, PhotosError> {
        let RedirectListener {
            local_addr,
            callback_rx,
            shutdown_tx,
            mut server,
        } = self;

        let callback = tokio::select! {
            callback = callback_rx => callback
                .map_err(|_| PhotosError::Auth("redirect listener closed before a code arrived".into()))?,
            stopped = &mut server => {
                let reason = match stopped {
                    Ok(Ok(())) => "stopped".to_string(),
                    Ok(Err(err)) => err.to_string(),
                    Err(err) => err.to_string(),
                };
                return Err(PhotosError::Auth(format!(
                    "redirect listener on {local_addr} failed: {reason}"
                )));
            }
        };

        let _ = shutdown_tx.send(());
        match server.await {
            Ok(Ok(())) => info!("redirect listener on {local_addr} shut down"),
            Ok(Err(err)) => warn!("redirect listener on {local_addr} shut down with: {err}"),
            Err(err) => warn!("redirect listener task on {local_addr} failed: {err}"),
        }

        callback.map_err(|reason| PhotosError::Auth(format!("authorization denied: {reason}")))
    }
}

async fn capture_redirect(
    State(state): State<Arc<RedirectState>>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, &'static str) {
    if params.get(STATE_QUERY_KEY) != Some(&state.expected_state) {
        debug!("rejecting redirect with mismatched state");
        return (StatusCode::UNAUTHORIZED, "invalid state");
    }

    let callback = match (params.get(CODE_QUERY_KEY), params.get(ERROR_QUERY_KEY)) {
        (_, Some(error)) => Err(error.clone()),
        (Some(code), None) if !code.is_empty() => Ok(code.clone()),
        _ => Err("redirect did not include a code".to_string()),
    };
    let authorized = callback.is_ok();

    let callback_tx = match state.callback_tx.lock() {
        Ok(mut slot) => slot.take(),
        Err(_) => None,
    };
    let Some(callback_tx) = callback_tx else {
        return (StatusCode::GONE, "authorization already received");
    };
    let _ = callback_tx.send(callback);

    if authorized {
        (StatusCode::OK, "Authenticated Successfully")
    } else {
        (StatusCode::BAD_REQUEST, "Authentication Failed")
    }
}
