/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use async_trait::async_trait;
use photoslibrary::auth::{
    AuthorizedTransport, OAuthConfig, PHOTOS_LIBRARY_READONLY_SCOPE, Token,
};
use photoslibrary::v1::{PhotosError, Transport};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted reply for one request
#[allow(dead_code)]
pub(crate) enum Reply {
    Json(Value),
    Raw(u16, &'static str),
    Fail(&'static str),
    Delayed(Duration, Value),
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: reqwest::Method,
    pub url: reqwest::Url,
    pub body: Option<Vec<u8>>,
}

impl Recorded {
    #[allow(dead_code)]
    pub fn query(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

/// Transport double that records requests and answers them from a script
#[derive(Default)]
pub(crate) struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<Recorded>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

fn response(status: u16, body: Vec<u8>) -> reqwest::Response {
    http::Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(body)
        .unwrap()
        .into()
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, PhotosError> {
        let body = request
            .body()
            .and_then(|b| b.as_bytes())
            .map(|b| b.to_vec());
        self.requests.lock().unwrap().push(Recorded {
            method: request.method().clone(),
            url: request.url().clone(),
            body,
        });

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Json(value)) => Ok(response(200, serde_json::to_vec(&value).unwrap())),
            Some(Reply::Raw(status, body)) => Ok(response(status, body.as_bytes().to_vec())),
            Some(Reply::Fail(cause)) => Err(PhotosError::Transport(cause.into())),
            Some(Reply::Delayed(delay, value)) => {
                tokio::time::sleep(delay).await;
                Ok(response(200, serde_json::to_vec(&value).unwrap()))
            }
            None => Err(PhotosError::Transport("no scripted reply left".into())),
        }
    }
}

/// Album list page body
#[allow(dead_code)]
pub(crate) fn albums_page(ids: &[&str], next_page_token: &str) -> Value {
    let albums: Vec<Value> = ids
        .iter()
        .map(|id| json!({"id": id, "title": format!("Album {id}")}))
        .collect();
    json!({"albums": albums, "nextPageToken": next_page_token})
}

/// Media item list/search page body
#[allow(dead_code)]
pub(crate) fn media_items_page(ids: &[&str], next_page_token: &str) -> Value {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "filename": format!("{id}.jpg"),
                "mimeType": "image/jpeg",
                "mediaMetadata": {
                    "creationTime": "2023-06-01T12:30:00Z",
                    "width": "4032",
                    "height": "3024",
                    "photo": {"cameraMake": "Pixel", "focalLength": 4.38, "isoEquivalent": 50}
                }
            })
        })
        .collect();
    json!({"mediaItems": items, "nextPageToken": next_page_token})
}

#[allow(dead_code)]
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Deserialize, Debug)]
struct PhotosTokenCache {
    refresh_token: String,
}

fn get_cached_refresh_token(path: PathBuf) -> anyhow::Result<PhotosTokenCache> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

/// Transport for the live API built from the client registration in the environment and a
/// refresh token cached by an earlier login
#[allow(dead_code)]
pub(crate) fn get_read_only_transport() -> anyhow::Result<AuthorizedTransport> {
    let client_id = std::env::var("PHOTOS_CLIENT_ID")?;
    let client_secret = std::env::var("PHOTOS_CLIENT_SECRET")?;
    let token_cache = std::env::var("PHOTOS_AUTH_CACHE")?;
    let cache = get_cached_refresh_token(token_cache.into())?;

    let config = OAuthConfig::google(
        &client_id,
        &client_secret,
        "http://127.0.0.1:8085",
        &[PHOTOS_LIBRARY_READONLY_SCOPE],
    );
    Ok(AuthorizedTransport::new(
        config,
        Token::from_refresh_token(&cache.refresh_token),
    ))
}
