/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1::errors::PhotosError;
use crate::v1::parsers::{from_int64_str, from_video_status};
use crate::v1::request::{QueryParams, get_with_json_body, get_with_query};
use crate::v1::{
    Client, EXCLUDE_NON_APP_CREATED_DATA_QUERY_KEY, Filters, PAGE_SIZE_QUERY_KEY,
    PAGE_TOKEN_QUERY_KEY, Page, PageRequest, PageResponse, PageStream, VideoProcessingStatus,
    paginate,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Holds information returned from the MediaItems API.
///
/// See [Photos Library API Docs](https://developers.google.com/photos/library/reference/rest/v1/mediaItems)
/// for more details on the individual fields.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub product_url: String,

    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub mime_type: String,

    #[serde(default)]
    pub media_metadata: Option<MediaMetadata>,

    #[serde(default)]
    pub contributor_info: Option<ContributorInfo>,

    #[serde(default)]
    pub filename: String,
}

impl MediaItem {
    const PATH: &'static str = "mediaItems";
    const SEARCH_PATH: &'static str = "mediaItems:search";

    /// Returns information for the specified media item id
    pub async fn from_id(client: Client, id: &str) -> Result<Self, PhotosError> {
        let req_url = client.endpoint(Self::PATH, &[id])?;
        client.get::<MediaItem>(req_url).await
    }

    /// Lists all media items in the user's library
    pub fn list(
        client: Client,
        request: ListMediaItemsRequest,
        cancel: CancellationToken,
    ) -> PageStream<MediaItem> {
        paginate(client, request, cancel)
    }

    /// Searches the library, or a single album, for media items
    pub fn search(
        client: Client,
        request: SearchMediaItemsRequest,
        cancel: CancellationToken,
    ) -> PageStream<MediaItem> {
        paginate(client, request, cancel)
    }

    /// Downloads the original content of the item.
    ///
    /// Base urls expire about an hour after the item was fetched; refetch the item with
    /// [`MediaItem::from_id`] if the download is refused.
    pub async fn download(&self, client: Client) -> Result<Bytes, PhotosError> {
        if self.base_url.is_empty() {
            return Err(PhotosError::InvalidRequest(format!(
                "media item {} has no base url",
                self.id
            )));
        }
        // "=dv" gives the video file, "=d" the photo with its metadata
        let suffix = if self.is_video() { "=dv" } else { "=d" };
        let url = Url::parse(&format!("{}{suffix}", self.base_url))?;
        client.get_bytes(url).await
    }

    pub fn is_video(&self) -> bool {
        self.media_metadata
            .as_ref()
            .is_some_and(|m| m.video.is_some())
    }
}

impl std::fmt::Display for MediaItem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "filename: {}, id: {}", self.filename, self.id)
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    #[serde(default)]
    pub creation_time: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "from_int64_str")]
    pub width: Option<u64>,

    #[serde(default, deserialize_with = "from_int64_str")]
    pub height: Option<u64>,

    #[serde(default)]
    pub photo: Option<Photo>,

    #[serde(default)]
    pub video: Option<Video>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[serde(default)]
    pub camera_make: String,

    #[serde(default)]
    pub camera_model: String,

    #[serde(default)]
    pub focal_length: f64,

    #[serde(default, rename = "apertureFNumber")]
    pub aperture_f_number: f64,

    #[serde(default)]
    pub iso_equivalent: i64,

    // Duration such as "0.008s"
    #[serde(default)]
    pub exposure_time: String,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(default)]
    pub camera_make: String,

    #[serde(default)]
    pub camera_model: String,

    #[serde(default)]
    pub fps: f64,

    #[serde(default, deserialize_with = "from_video_status")]
    pub status: VideoProcessingStatus,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContributorInfo {
    #[serde(default)]
    pub profile_picture_base_url: String,

    #[serde(default)]
    pub display_name: String,
}

/// Parameters for listing every media item in the library
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListMediaItemsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub page_token: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exclude_non_app_created_data: bool,
}

impl PageRequest for ListMediaItemsRequest {
    type Response = ListMediaItemsResponse;
    const PATH: &'static str = MediaItem::PATH;

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

// Expected response for a request to list media items
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListMediaItemsResponse {
    #[serde(default)]
    media_items: Vec<MediaItem>,

    #[serde(default)]
    next_page_token: String,
}

impl PageResponse for ListMediaItemsResponse {
    type Item = MediaItem;

    fn into_page(self) -> Page<MediaItem> {
        Page {
            items: self.media_items,
            next_page_token: self.next_page_token,
        }
    }
}

/// Parameters for searching media items.
///
/// The whole value is sent as the JSON body of the request; unset fields are left out.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchMediaItemsRequest {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub album_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub page_token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,

    // e.g. "MediaMetadata.creation_time desc"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
}

impl SearchMediaItemsRequest {
    /// Search restricted to the items of one album
    pub fn in_album(album_id: &str) -> Self {
        Self {
            album_id: album_id.into(),
            ..Default::default()
        }
    }

    /// Search across the library using filters
    pub fn with_filters(filters: Filters) -> Self {
        Self {
            filters: Some(filters).filter(|f| !f.is_empty()),
            ..Default::default()
        }
    }
}

impl PageRequest for SearchMediaItemsRequest {
    type Response = SearchMediaItemsResponse;
    const PATH: &'static str = MediaItem::SEARCH_PATH;

    fn page_token(&self) -> &str {
        &self.page_token
    }

    fn set_page_token(&mut self, token: String) {
        self.page_token = token;
    }

    fn build_request(&self, endpoint: Url) -> Result<reqwest::Request, PhotosError> {
        // Zero page size and empty filters mean "unspecified" here as well
        let mut body = self.clone();
        body.page_size = body.page_size.filter(|s| *s > 0);
        body.filters = body.filters.filter(|f| !f.is_empty());
        get_with_json_body(endpoint, &body)
    }
}

// Expected response for a media item search
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SearchMediaItemsResponse {
    #[serde(default)]
    media_items: Vec<MediaItem>,

    #[serde(default)]
    next_page_token: String,
}

impl PageResponse for SearchMediaItemsResponse {
    type Item = MediaItem;

    fn into_page(self) -> Page<MediaItem> {
        Page {
            items: self.media_items,
            next_page_token: self.next_page_token,
        }
    }
}
