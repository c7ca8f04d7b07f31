/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1::errors::PhotosError;
use crate::v1::page::PageResponse;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Url};
use serde::Serialize;

/// A request against one of the paginated endpoints.
///
/// The driver in [`crate::v1::paginate`] keeps its own copy of the request and only ever
/// touches the page token, setting it to the token returned with the previous page.
pub trait PageRequest: Clone + Send + Sync + 'static {
    /// Body returned for one page of this request
    type Response: PageResponse;

    /// Endpoint path under the API version, e.g. `albums`
    const PATH: &'static str;

    fn page_token(&self) -> &str;

    fn set_page_token(&mut self, token: String);

    /// Builds the request for the endpoint url resolved from [`Self::PATH`]
    fn build_request(&self, endpoint: Url) -> Result<reqwest::Request, PhotosError>;
}

/// Query parameters that leave out anything the server should treat as unspecified.
///
/// The server distinguishes "not sent" from an explicit zero, so zero, empty and false
/// values are never written.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` when it is set and greater than zero
    pub fn positive(mut self, key: &'static str, value: Option<u32>) -> Self {
        if let Some(value) = value.filter(|v| *v > 0) {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    /// Adds `value` when it is not empty
    pub fn non_empty(mut self, key: &'static str, value: &str) -> Self {
        if !value.is_empty() {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    /// Adds `true` when the flag is set
    pub fn flag(mut self, key: &'static str, value: bool) -> Self {
        if value {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    fn apply(&self, url: &mut Url) {
        if self.pairs.is_empty() {
            return;
        }
        url.query_pairs_mut()
            .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())));
    }
}

/// Builds a GET request with the parameters in the query string
pub fn get_with_query(
    mut endpoint: Url,
    params: &QueryParams,
) -> Result<reqwest::Request, PhotosError> {
    params.apply(&mut endpoint);
    let mut req = reqwest::Request::new(Method::GET, endpoint);
    req.headers_mut()
        .insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(req)
}

/// Builds a GET request carrying the whole payload as a JSON body
pub fn get_with_json_body<B: Serialize>(
    endpoint: Url,
    body: &B,
) -> Result<reqwest::Request, PhotosError> {
    let data = serde_json::to_vec(body)
        .map_err(|e| PhotosError::InvalidRequest(format!("failed serializing body: {e}")))?;
    let mut req = reqwest::Request::new(Method::GET, endpoint);
    req.headers_mut()
        .insert(ACCEPT, HeaderValue::from_static("application/json"));
    req.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *req.body_mut() = Some(data.into());
    Ok(req)
}
