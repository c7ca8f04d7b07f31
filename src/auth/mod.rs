/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! OAuth2 login for installed applications.
//!
//! [`authenticate`] runs the authorization-code flow with PKCE: the user is sent to the
//! provider's consent page, the provider redirects back to a listener started on the
//! configured redirect url, and the code from that redirect is exchanged for a token. The
//! result is an [`AuthorizedTransport`] that can be handed to [`crate::v1::Client::new`].
//!
//! Credentials come from the [Google Developer Console](https://console.developers.google.com);
//! the redirect url must be a loopback address registered for the client.

mod pkce;
mod redirect;
mod token;

pub use token::{AuthorizedTransport, Token};

use crate::v1::PhotosError;
use log::debug;
use redirect::RedirectListener;
use std::sync::Arc;
use url::Url;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

pub const PHOTOS_LIBRARY_SCOPE: &str = "https://www.googleapis.com/auth/photoslibrary";
pub const PHOTOS_LIBRARY_READONLY_SCOPE: &str =
    "https://www.googleapis.com/auth/photoslibrary.readonly";
pub const PHOTOS_LIBRARY_APPENDONLY_SCOPE: &str =
    "https://www.googleapis.com/auth/photoslibrary.appendonly";
pub const PHOTOS_LIBRARY_READONLY_APP_CREATED_SCOPE: &str =
    "https://www.googleapis.com/auth/photoslibrary.readonly.appcreateddata";
pub const PHOTOS_LIBRARY_EDIT_APP_CREATED_SCOPE: &str =
    "https://www.googleapis.com/auth/photoslibrary.edit.appcreateddata";

/// OAuth2 client registration and provider endpoints
#[derive(Clone, Default)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub redirect_url: String,
    pub scopes: Vec<String>,
    /// Extra parameters appended to the authorization url
    pub auth_params: Vec<(String, String)>,
}

impl OAuthConfig {
    /// Configuration for Google's endpoints, asking for offline access so a refresh token is
    /// issued
    pub fn google(
        client_id: &str,
        client_secret: &str,
        redirect_url: &str,
        scopes: &[&str],
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auth_url: GOOGLE_AUTH_URL.into(),
            token_url: GOOGLE_TOKEN_URL.into(),
            redirect_url: redirect_url.into(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            auth_params: vec![("access_type".into(), "offline".into())],
        }
    }

    /// Url of the consent page for this login attempt
    pub(crate) fn auth_code_url(&self, state: &str, challenge: &str) -> Result<Url, PhotosError> {
        let mut url = Url::parse(&self.auth_url)?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_url)
            .append_pair("scope", &self.scopes.join(" "))
            .append_pair("state", state)
            .append_pair("code_challenge", challenge)
            .append_pair("code_challenge_method", pkce::CHALLENGE_METHOD)
            .extend_pairs(self.auth_params.iter());
        Ok(url)
    }
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"xxx")
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("redirect_url", &self.redirect_url)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Called with the consent page url that the user has to visit
pub type AuthCodeUrlHandler = Arc<dyn Fn(String) + Send + Sync>;

/// Default handler, prints the url to stdout
pub fn print_auth_code_url(auth_code_url: String) {
    println!("Visit the URL for the auth dialog: {auth_code_url}");
}

/// Runs the browser login flow
pub struct Authenticator {
    config: OAuthConfig,
    http: reqwest::Client,
    auth_code_url_handler: AuthCodeUrlHandler,
}

impl Authenticator {
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            auth_code_url_handler: Arc::new(print_auth_code_url),
        }
    }

    /// Replaces how the consent url is presented (open a browser, show a dialog, ...).
    ///
    /// The handler runs on a blocking thread so it may block.
    pub fn with_auth_code_url_handler(
        mut self,
        handler: impl Fn(String) + Send + Sync + 'static,
    ) -> Self {
        self.auth_code_url_handler = Arc::new(handler);
        self
    }

    /// HTTP client used for the token exchange and by the returned transport
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Waits for the user to grant access and returns a transport carrying the new token
    pub async fn authenticate(self) -> Result<AuthorizedTransport, PhotosError> {
        let state = pkce::state_nonce();
        let verifier = pkce::Verifier::generate();
        let redirect_url = Url::parse(&self.config.redirect_url)?;

        let listener = RedirectListener::bind(&redirect_url, state.clone()).await?;

        let auth_code_url = self.config.auth_code_url(&state, &verifier.challenge())?;
        debug!("authorization url: {auth_code_url}");
        let handler = self.auth_code_url_handler.clone();
        // Run in the background in case it blocks
        tokio::task::spawn_blocking(move || handler(auth_code_url.to_string()));

        let code = listener.wait_for_code().await?;
        let token = token::exchange_code(&self.http, &self.config, &code, &verifier).await?;
        Ok(AuthorizedTransport::with_http_client(
            self.http,
            self.config,
            token,
        ))
    }
}

/// Runs the login flow with the default url handler
pub async fn authenticate(config: OAuthConfig) -> Result<AuthorizedTransport, PhotosError> {
    Authenticator::new(config).authenticate().await
}
