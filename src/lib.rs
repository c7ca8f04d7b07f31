/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! # Photos Library
//!
//! This library was created for working with the Google Photos Library API v1 interface.
//!
//! For further details on the Rest API refer to the [Photos Library API Docs](https://developers.google.com/photos/library/reference/rest)
//!
//! ## Features
//!
//! - Album information
//!     - List the albums of the user
//!     - Create an Album
//!     - List the media items contained in an Album
//! - Media item information
//!     - List the media items of the user
//!     - Search with date, content, media type and feature filters
//! - List and search results are streamed page by page in the background and can be
//!   cancelled at any point
//! - OAuth2 login (authorization code with PKCE) through a local redirect listener, with
//!   transparent token refresh
//! - Lower level interface for handling the raw communication
//!
//! *If you want to use this library for more than what is currently implemented, the
//! [`v1::Client`] and [`v1::Transport`] are a way to make request/responses in a more direct way*
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! photoslibrary = "0.1.0"
//! ```
//!
//! ## Usage
//!
//! **You will need to acquire an OAuth client id/secret from the Google Developer Console prior
//! to using the API**
//!
//! ```rust,no_run
//! use photoslibrary::auth::{self, OAuthConfig, PHOTOS_LIBRARY_READONLY_SCOPE};
//! use photoslibrary::v1::{Album, Client, ListAlbumsRequest};
//! use tokio_util::sync::CancellationToken;
//!
//! async fn iterate_albums(client_id: &str, client_secret: &str) -> anyhow::Result<()> {
//!     let config = OAuthConfig::google(
//!         client_id,
//!         client_secret,
//!         "http://127.0.0.1:8085",
//!         &[PHOTOS_LIBRARY_READONLY_SCOPE],
//!     );
//!     // Prints the consent url and waits for the browser to be redirected back
//!     let client = Client::new(auth::authenticate(config).await?);
//!
//!     let cancel = CancellationToken::new();
//!     let mut albums = Album::list(client.clone(), ListAlbumsRequest::default(), cancel.clone());
//!     while let Some(album) = albums.next_item().await {
//!         println!("Found album: {}", album.title);
//!
//!         // Stop paging once the album we were after shows up
//!         if album.title == "Holidays" {
//!             cancel.cancel();
//!         }
//!     }
//!     if let Some(err) = albums.error().await {
//!         return Err(err.into());
//!     }
//!     Ok(())
//! }
//! ```
//!
pub mod auth;
pub mod v1;
