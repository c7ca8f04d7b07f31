/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1::errors::PhotosError;
use crate::v1::parsers::{from_empty_str_to_none, from_int64_str};
use crate::v1::request::{QueryParams, get_with_query};
use crate::v1::{
    Client, EXCLUDE_NON_APP_CREATED_DATA_QUERY_KEY, MediaItem, PAGE_SIZE_QUERY_KEY,
    PAGE_TOKEN_QUERY_KEY, Page, PageRequest, PageResponse, PageStream, SearchMediaItemsRequest,
    paginate,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio_util::sync::CancellationToken;

/// Holds information returned from the Albums API.
///
/// See [Photos Library API Docs](https://developers.google.com/photos/library/reference/rest/v1/albums)
/// for more details on the individual fields.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub product_url: String,

    #[serde(default)]
    pub is_writeable: bool,

    #[serde(default)]
    pub share_info: Option<ShareInfo>,

    #[serde(default, deserialize_with = "from_int64_str")]
    pub media_items_count: Option<u64>,

    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    pub cover_photo_base_url: Option<String>,

    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    pub cover_photo_media_item_id: Option<String>,
}

impl Album {
    const PATH: &'static str = "albums";

    /// Returns information for the specified album id
    pub async fn from_id(client: Client, id: &str) -> Result<Self, PhotosError> {
        let req_url = client.endpoint(Self::PATH, &[id])?;
        client.get::<Album>(req_url).await
    }

    /// Lists the albums shown to the user in the Albums tab
    pub fn list(
        client: Client,
        request: ListAlbumsRequest,
        cancel: CancellationToken,
    ) -> PageStream<Album> {
        paginate(client, request, cancel)
    }

    /// Creates an album in the user's library
    pub async fn create(client: Client, props: CreateAlbumProps) -> Result<Album, PhotosError> {
        let req_url = client.endpoint(Self::PATH, &[])?;
        let data = serde_json::to_vec(&json!({ "album": props }))
            .map_err(|e| PhotosError::InvalidRequest(format!("failed serializing album: {e}")))?;
        client.post::<Album>(req_url, data).await
    }

    /// Retrieves the media items contained in this Album
    pub fn media_items(&self, client: Client, cancel: CancellationToken) -> PageStream<MediaItem> {
        MediaItem::search(client, SearchMediaItemsRequest::in_album(&self.id), cancel)
    }
}

impl std::fmt::Display for Album {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "title: {}, id: {}", self.title, self.id)
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShareInfo {
    #[serde(default)]
    pub shared_album_options: SharedAlbumOptions,

    #[serde(default)]
    pub shareable_url: String,

    #[serde(default)]
    pub share_token: String,

    #[serde(default)]
    pub is_joined: bool,

    #[serde(default)]
    pub is_owned: bool,

    #[serde(default)]
    pub is_joinable: bool,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SharedAlbumOptions {
    #[serde(default)]
    pub is_collaborative: bool,

    #[serde(default)]
    pub is_commentable: bool,
}

/// Properties that can be used in the creation of an Album
#[derive(Serialize, Default, Debug, Clone)]
pub struct CreateAlbumProps {
    #[serde(rename = "title")]
    pub title: String,
}

impl CreateAlbumProps {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// Parameters for listing albums.
///
/// `page_size` of `None` or zero leaves the choice to the server
/// ([`crate::v1::DEFAULT_PAGE_SIZE`], at most [`crate::v1::MAX_PAGE_SIZE`]).
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListAlbumsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub page_token: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exclude_non_app_created_data: bool,
}

impl PageRequest for ListAlbumsRequest {
    type Response = ListAlbumsResponse;
    const PATH: &'static str = Album::PATH;

    fn page_token(&self) -> &str {
        &self.page_token
    }

    fn set_page_token(&mut self, token: String) {
        self.page_token = token;
    }

    fn build_request(&self, endpoint: Url) -> Result<reqwest::Request, PhotosError> {
        let params = QueryParams::new()
            .positive(PAGE_SIZE_QUERY_KEY, self.page_size)
            .non_empty(PAGE_TOKEN_QUERY_KEY, &self.page_token)
            .flag(
                EXCLUDE_NON_APP_CREATED_DATA_QUERY_KEY,
                self.exclude_non_app_created_data,
            );
        get_with_query(endpoint, &params)
    }
}

// Expected response for a request to list albums
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListAlbumsResponse {
    #[serde(default)]
    albums: Vec<Album>,

    #[serde(default)]
    next_page_token: String,
}

impl PageResponse for ListAlbumsResponse {
    type Item = Album;

    fn into_page(self) -> Page<Album> {
        Page {
            items: self.albums,
            next_page_token: self.next_page_token,
        }
    }
}
