/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1::errors::PhotosError;
use crate::v1::{API_ORIGIN, API_VERSION, Transport};
use bytes::Bytes;
use log::debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Handle used for all communication with the Photos Library API.
///
/// Cloning is cheap; clones share the same [`Transport`] and so the same connection pool.
///
/// ```rust,no_run
/// use photoslibrary::v1::Client;
///
/// let client = Client::new(reqwest::Client::new());
/// ```
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    base_url: Url,
}

impl Client {
    /// Creates a client talking to the public API through the given transport
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::from_shared(Arc::new(transport))
    }

    /// Creates a client from a transport that is already shared
    pub fn from_shared(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            base_url: Url::parse(API_ORIGIN).expect("API_ORIGIN is a valid url"),
        }
    }

    /// Points the client at a different API origin (for example a local test server)
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, PhotosError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(PhotosError::InvalidRequest(format!(
                "base url cannot hold a path: {base_url}"
            )));
        }
        self.base_url = base_url;
        Ok(self)
    }

    /// Origin all endpoint paths are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Builds the full url for an API path such as `albums` or `mediaItems:search`.
    ///
    /// Additional segments (ids) are percent-encoded as single path segments.
    pub fn endpoint(&self, path: &str, segments: &[&str]) -> Result<Url, PhotosError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                PhotosError::InvalidRequest(format!(
                    "base url cannot hold a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push(API_VERSION)
            .push(path)
            .extend(segments);
        Ok(url)
    }

    /// Performs a get request for a single object
    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, PhotosError> {
        let mut req = reqwest::Request::new(Method::GET, url);
        req.headers_mut()
            .insert(ACCEPT, HeaderValue::from_static("application/json"));
        self.send(req).await
    }

    /// Performs a post request with a JSON body
    pub async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        data: Vec<u8>,
    ) -> Result<T, PhotosError> {
        let mut req = reqwest::Request::new(Method::POST, url);
        req.headers_mut()
            .insert(ACCEPT, HeaderValue::from_static("application/json"));
        req.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        *req.body_mut() = Some(data.into());
        self.send(req).await
    }

    /// Performs a get request for raw content such as a media download.
    ///
    /// Unlike the JSON endpoints, a non-success status is reported as an error since the body
    /// would not be the requested content.
    pub async fn get_bytes(&self, url: Url) -> Result<Bytes, PhotosError> {
        let req = reqwest::Request::new(Method::GET, url);
        debug!("{} {}", req.method(), req.url());
        let resp = self.transport.execute(req).await?.error_for_status()?;
        Ok(resp.bytes().await?)
    }

    async fn send<T: DeserializeOwned>(&self, req: reqwest::Request) -> Result<T, PhotosError> {
        debug!("{} {}", req.method(), req.url());
        let resp = self.transport.execute(req).await?;
        debug!("received response status: {}", resp.status());
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice::<T>(&body)?)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}
