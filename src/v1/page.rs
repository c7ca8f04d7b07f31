/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1::errors::PhotosError;
use crate::v1::{Client, PageRequest};
use log::debug;
use serde::de::DeserializeOwned;

/// One decoded batch of results.
///
/// `items` are in the order the server returned them. An empty `next_page_token` means this
/// was the last page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: String,
}

impl<T> Page<T> {
    pub fn is_last(&self) -> bool {
        self.next_page_token.is_empty()
    }
}

/// Response body of a paginated endpoint
pub trait PageResponse: DeserializeOwned + Send + 'static {
    type Item: Send + 'static;

    fn into_page(self) -> Page<Self::Item>;
}

/// Item type produced by a [`PageRequest`]
pub type PageItem<R> = <<R as PageRequest>::Response as PageResponse>::Item;

/// Fetches and decodes a single page for the request as it currently stands.
///
/// The status code is not inspected; a body that does not decode into the endpoint's
/// response shape is reported as [`PhotosError::Decode`].
pub async fn fetch_page<R: PageRequest>(
    client: &Client,
    request: &R,
) -> Result<Page<PageItem<R>>, PhotosError> {
    let endpoint = client.endpoint(R::PATH, &[])?;
    let req = request.build_request(endpoint)?;
    debug!("fetching page {} {}", req.method(), req.url());

    let resp = client.transport().execute(req).await?;
    debug!("received response status: {}", resp.status());

    // Reading the body consumes the response and releases the connection
    let body = resp.bytes().await?;
    let page = serde_json::from_slice::<R::Response>(&body)?.into_page();
    debug!(
        "decoded page items: {} next page token: {:?}",
        page.items.len(),
        page.next_page_token
    );
    Ok(page)
}
