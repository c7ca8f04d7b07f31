/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

extern crate photoslibrary;

use anyhow::{Result, anyhow};
use dotenvy::dotenv;
use futures::{StreamExt, pin_mut};
use photoslibrary::auth::{AuthorizedTransport, OAuthConfig, PHOTOS_LIBRARY_READONLY_SCOPE, Token};
use photoslibrary::v1::{Album, Client, ListAlbumsRequest, MediaItem};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

// Only show this many items of the album
const MAX_ITEMS: usize = 25;

// Finds the album with the given title, stopping the listing as soon as it shows up
async fn find_album(client: Client, title: &str) -> Result<Option<Album>> {
    let cancel = CancellationToken::new();
    let mut albums = Album::list(client, ListAlbumsRequest::default(), cancel.clone());
    while let Some(album) = albums.next_item().await {
        if album.title == title {
            cancel.cancel();
            albums.close().await;
            return Ok(Some(album));
        }
    }
    match albums.error().await {
        Some(err) => Err(err.into()),
        None => Ok(None),
    }
}

// Prints the first items of the album
async fn print_album_items(client: Client, album: &Album) -> Result<()> {
    let cancel = CancellationToken::new();
    let items = album.media_items(client, cancel.clone()).into_stream();

    let mut shown = 0;
    pin_mut!(items);
    while let Some(item) = items.next().await {
        let item: MediaItem = item?;
        let created = item
            .media_metadata
            .as_ref()
            .and_then(|m| m.creation_time)
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        println!(
            "{}\t{}\t{}\t{}",
            item.filename,
            item.mime_type,
            created,
            if item.is_video() { "video" } else { "photo" }
        );

        shown += 1;
        if shown == MAX_ITEMS {
            // No need to fetch the rest of the pages
            cancel.cancel();
        }
    }
    println!("Showed {shown} of {:?} items", album.media_items_count);
    Ok(())
}

// main
#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let title = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: album_contents <album title>"))?;

    // Read-only: nothing here writes the cache back
    let client = Client::new(get_cached_transport()?);

    match find_album(client.clone(), &title).await? {
        Some(album) => print_album_items(client, &album).await,
        None => Err(anyhow!("no album titled {title}")),
    }
}

// Refresh token stored in cache json file
#[derive(Deserialize, Debug)]
struct PhotosTokenCache {
    refresh_token: String,
}

// Retrieves the cached refresh token.
fn get_cached_refresh_token(path: PathBuf) -> Result<PhotosTokenCache> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

fn get_cached_transport() -> Result<AuthorizedTransport> {
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
