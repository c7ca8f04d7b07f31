/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
mod helpers;

// These talk to the real API. They need PHOTOS_CLIENT_ID, PHOTOS_CLIENT_SECRET and
// PHOTOS_AUTH_CACHE (a json file holding a refresh_token) in the environment or a .env file.
#[cfg(test)]
mod test {
    use crate::helpers;
    use dotenvy::dotenv;
    use futures::{StreamExt, pin_mut};
    use photoslibrary::v1::{
        Album, Client, ListAlbumsRequest, MediaType, Filters, MediaItem, SearchMediaItemsRequest,
    };
    use tokio_util::sync::CancellationToken;

    #[ignore]
    #[tokio::test]
    async fn list_albums_and_contents() {
        dotenv().ok();
        let transport = helpers::get_read_only_transport().unwrap();
        let client = Client::new(transport);
        let cancel = CancellationToken::new();

        let request = ListAlbumsRequest {
            page_size: Some(5),
            ..Default::default()
        };
        let mut albums = Album::list(client.clone(), request, cancel.clone());
        let Some(album) = albums.next_item().await else {
            assert!(albums.error().await.is_none());
            return;
        };
        println!("Album info: {}", album);
        cancel.cancel();
        albums.close().await;

        let images = album.media_items(client, CancellationToken::new()).into_stream();
        let mut image_count: u64 = 0;
        pin_mut!(images);
        while let Some(image_result) = images.next().await {
            let _ = image_result.unwrap();
            image_count += 1;
        }
        if let Some(count) = album.media_items_count {
            assert_eq!(count, image_count);
        }
    }

    #[ignore]
    #[tokio::test]
    async fn search_videos_stops_early() {
        dotenv().ok();
        let transport = helpers::get_read_only_transport().unwrap();
        let client = Client::new(transport);
        let cancel = CancellationToken::new();

        let request = SearchMediaItemsRequest {
            page_size: Some(10),
            ..SearchMediaItemsRequest::with_filters(
                Filters::default().with_media_type(MediaType::Video),
            )
        };
        let mut videos = MediaItem::search(client, request, cancel.clone());
        let mut seen = 0;
        while let Some(video) = videos.next_item().await {
            println!("Video: {}", video);
            seen += 1;
            if seen == 15 {
                cancel.cancel();
            }
        }
        assert!(seen <= 15);
        assert!(videos.error().await.is_none());
    }
}
