/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

extern crate photoslibrary;

use anyhow::Result;
use dotenvy::dotenv;
use photoslibrary::auth::{self, OAuthConfig, PHOTOS_LIBRARY_READONLY_SCOPE};
use photoslibrary::v1::{Album, Client, ListAlbumsRequest, MAX_PAGE_SIZE};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

// Give up on listing after this long
const LIST_DEADLINE: Duration = Duration::from_secs(60);

// main
#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    // The client id/secret come from the Google Developer Console. The redirect url must be
    // registered for the client as well.
    let client_id = std::env::var("PHOTOS_CLIENT_ID")?;
    let client_secret = std::env::var("PHOTOS_CLIENT_SECRET")?;
    let redirect_url = std::env::var("PHOTOS_REDIRECT_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:8085".to_string());
    let config = OAuthConfig::google(
        &client_id,
        &client_secret,
        &redirect_url,
        &[PHOTOS_LIBRARY_READONLY_SCOPE],
    );

    // Prints the consent url, then waits for the browser to come back
    let transport = auth::authenticate(config).await?;

    // Tokens only live in memory. album_contents reads a cache file the user writes by hand.
    if transport.token().await.refresh_token.is_some() {
        println!("Login granted a refresh token");
    }

    let client = Client::new(transport);
    let cancel = CancellationToken::new();
    let deadline = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(LIST_DEADLINE).await;
        deadline.cancel();
    });

    let request = ListAlbumsRequest {
        page_size: Some(MAX_PAGE_SIZE),
        ..Default::default()
    };
    let mut albums = Album::list(client, request, cancel.clone());
    let mut album_count = 0;
    while let Some(album) = albums.next_item().await {
        println!(
            "Found album: {} items: {}",
            album,
            album.media_items_count.unwrap_or_default()
        );
        album_count += 1;
    }
    if let Some(err) = albums.error().await {
        return Err(err.into());
    }

    if cancel.is_cancelled() {
        println!("Stopped after {album_count} albums");
    } else {
        println!("Listed {album_count} albums");
    }
    Ok(())
}
