/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::auth::OAuthConfig;
use crate::auth::pkce::Verifier;
use crate::v1::{PhotosError, Transport};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use serde::Deserialize;
use tokio::sync::Mutex;

// Tokens are refreshed this long before they actually expire
const EXPIRY_DELTA_SECS: i64 = 10;

/// OAuth2 access token with its refresh token
#[derive(Clone)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub refresh_token: Option<String>,
    pub expiry: Option<DateTime<Utc>>,
}

impl Token {
    /// A token that must be refreshed before first use
    pub fn from_refresh_token(refresh_token: &str) -> Self {
        Self {
            access_token: String::new(),
            token_type: "Bearer".into(),
            refresh_token: Some(refresh_token.into()),
            expiry: None,
        }
    }

    /// True when the token expires within the refresh window of `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.access_token.is_empty()
            || self
                .expiry
                .is_some_and(|expiry| expiry - Duration::seconds(EXPIRY_DELTA_SECS) <= now)
    }

    fn from_response(resp: TokenResponse, previous_refresh: Option<String>) -> Self {
        Self {
            access_token: resp.access_token,
            token_type: resp.token_type.unwrap_or_else(|| "Bearer".into()),
            refresh_token: resp.refresh_token.or(previous_refresh),
            expiry: resp
                .expires_in
                .filter(|secs| *secs > 0)
                .map(|secs| Utc::now() + Duration::seconds(secs)),
        }
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"xxx")
            .field("token_type", &self.token_type)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "xxx"))
            .field("expiry", &self.expiry)
            .finish()
    }
}

// Expected response from the token endpoint
#[derive(Deserialize, Debug)]
struct TokenResponse {
    access_token: String,

    #[serde(default)]
    token_type: Option<String>,

    #[serde(default)]
    expires_in: Option<i64>,

    #[serde(default)]
    refresh_token: Option<String>,
}

async fn request_token(
    http: &reqwest::Client,
    token_url: &str,
    params: &[(&str, &str)],
) -> Result<TokenResponse, PhotosError> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    let resp = http
        .post(token_url)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(ACCEPT, "application/json")
        .body(body)
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(PhotosError::Auth(format!(
            "token endpoint returned {status}: {text}"
        )));
    }
    resp.json::<TokenResponse>()
        .await
        .map_err(|e| PhotosError::Auth(format!("malformed token response: {e}")))
}

/// Exchanges an authorization code (with its PKCE verifier) for a token
pub(crate) async fn exchange_code(
    http: &reqwest::Client,
    config: &OAuthConfig,
    code: &str,
    verifier: &Verifier,
) -> Result<Token, PhotosError> {
    let resp = request_token(
        http,
        &config.token_url,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_url.as_str()),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("code_verifier", verifier.as_str()),
        ],
    )
    .await?;
    debug!("exchanged authorization code for token");
    Ok(Token::from_response(resp, None))
}

async fn refresh_token(
    http: &reqwest::Client,
    config: &OAuthConfig,
    refresh_token: &str,
) -> Result<Token, PhotosError> {
    let resp = request_token(
        http,
        &config.token_url,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
        ],
    )
    .await?;
    info!("refreshed access token");
    Ok(Token::from_response(resp, Some(refresh_token.to_string())))
}

/// [`Transport`] that authorizes every request with an OAuth2 bearer token.
///
/// The token is refreshed transparently when it is about to expire. Safe to share between
/// concurrent paginations; refreshes are serialized.
pub struct AuthorizedTransport {
    http: reqwest::Client,
    config: OAuthConfig,
    token: Mutex<Token>,
}

impl AuthorizedTransport {
    pub fn new(config: OAuthConfig, token: Token) -> Self {
        Self::with_http_client(reqwest::Client::new(), config, token)
    }

    pub fn with_http_client(http: reqwest::Client, config: OAuthConfig, token: Token) -> Self {
        Self {
            http,
            config,
            token: Mutex::new(token),
        }
    }

    /// Current token, for callers that want to keep the refresh token
    pub async fn token(&self) -> Token {
        self.token.lock().await.clone()
    }

    async fn authorization(&self) -> Result<HeaderValue, PhotosError> {
        let mut token = self.token.lock().await;
        if token.is_expired(Utc::now()) {
            let refresh = token.refresh_token.clone().ok_or_else(|| {
                PhotosError::Auth("token expired and no refresh token is available".into())
            })?;
            *token = refresh_token(&self.http, &self.config, &refresh).await?;
        }
        HeaderValue::from_str(&format!("Bearer {}", token.access_token))
            .map_err(|e| PhotosError::Auth(format!("access token is not a valid header: {e}")))
    }
}

#[async_trait]
impl Transport for AuthorizedTransport {
    async fn execute(
        &self,
        mut request: reqwest::Request,
    ) -> Result<reqwest::Response, PhotosError> {
        let authorization = self.authorization().await?;
        request.headers_mut().insert(AUTHORIZATION, authorization);
        Ok(self.http.execute(request).await?)
    }
}

impl std::fmt::Debug for AuthorizedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizedTransport")
            .field("config", &self.config)
            .finish()
    }
}
