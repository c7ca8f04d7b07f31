/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1::errors::PhotosError;
use async_trait::async_trait;

// Root Photos Library API
pub const API_ORIGIN: &str = "https://photoslibrary.googleapis.com/";
pub const API_VERSION: &str = "v1";

/// Page size the server uses when none is requested
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size accepted when listing albums
pub const MAX_PAGE_SIZE: u32 = 50;

/// Largest page size accepted when listing or searching media items
pub const MAX_MEDIA_ITEMS_PAGE_SIZE: u32 = 100;

pub const PAGE_SIZE_QUERY_KEY: &str = "pageSize";
pub const PAGE_TOKEN_QUERY_KEY: &str = "pageToken";
pub const EXCLUDE_NON_APP_CREATED_DATA_QUERY_KEY: &str = "excludeNonAppCreatedData";

/// Executes requests against the API.
///
/// This is the seam between the client and the network. [`reqwest::Client`] implements it
/// directly for unauthenticated use and [`crate::auth::AuthorizedTransport`] wraps one to add
/// OAuth2 bearer tokens. Tests can supply their own implementation that inspects the requests
/// and fabricates responses.
///
/// Implementations are shared between concurrent paginations and must not depend on call order.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the response without interpreting its status.
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, PhotosError>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, PhotosError> {
        Ok(reqwest::Client::execute(self, request).await?)
    }
}
