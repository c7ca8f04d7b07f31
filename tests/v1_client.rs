/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
mod helpers;

#[cfg(test)]
mod test {
    use crate::helpers::{self, albums_page, media_items_page};
    use photoslibrary::v1::{
        Album, Client, CreateAlbumProps, ListAlbumsRequest, MediaItem, PhotosError,
        SearchMediaItemsRequest, VideoProcessingStatus, fetch_page,
    };
    use serde_json::json;
    use tokio_util::sync::CancellationToken;
    use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> Client {
        Client::new(reqwest::Client::new())
            .with_base_url(&server.uri())
            .unwrap()
    }

    #[tokio::test]
    async fn lists_albums_across_pages() {
        helpers::init_logging();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/albums"))
            .and(query_param_is_missing("pageToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(albums_page(&["a1", "a2"], "p2")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/albums"))
            .and(query_param("pageToken", "p2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(albums_page(&["a3"], "")))
            .expect(1)
            .mount(&server)
            .await;

        let mut albums = Album::list(
            client_for(&server),
            ListAlbumsRequest::default(),
            CancellationToken::new(),
        );
        let mut titles = Vec::new();
        while let Some(album) = albums.next_item().await {
            titles.push(album.title);
        }

        assert_eq!(titles, vec!["Album a1", "Album a2", "Album a3"]);
        assert!(albums.error().await.is_none());
    }

    #[tokio::test]
    async fn fetches_a_single_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/mediaItems"))
            .and(query_param("pageSize", "2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(media_items_page(&["m1", "m2"], "more")),
            )
            .mount(&server)
            .await;

        let request = photoslibrary::v1::ListMediaItemsRequest {
            page_size: Some(2),
            ..Default::default()
        };
        let page = fetch_page(&client_for(&server), &request).await.unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.next_page_token, "more");
        assert!(!page.is_last());
        let metadata = page.items[0].media_metadata.as_ref().unwrap();
        assert_eq!(metadata.width, Some(4032));
        assert_eq!(metadata.height, Some(3024));
        assert_eq!(
            metadata.photo.as_ref().map(|p| p.camera_make.as_str()),
            Some("Pixel")
        );
    }

    #[tokio::test]
    async fn album_from_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/albums/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "abc123",
                "title": "Road trip",
                "productUrl": "https://photos.google.com/lr/album/abc123",
                "mediaItemsCount": "42",
                "coverPhotoBaseUrl": "",
                "shareInfo": {"isJoined": true, "isOwned": false}
            })))
            .mount(&server)
            .await;

        let album = Album::from_id(client_for(&server), "abc123").await.unwrap();

        assert_eq!(album.title, "Road trip");
        assert_eq!(album.media_items_count, Some(42));
        assert_eq!(album.cover_photo_base_url, None);
        assert!(album.share_info.is_some());
    }

    #[tokio::test]
    async fn media_item_from_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/mediaItems/vid1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "vid1",
                "filename": "clip.mp4",
                "mimeType": "video/mp4",
                "mediaMetadata": {
                    "creationTime": "2022-02-03T04:05:06Z",
                    "width": 1920,
                    "height": "1080",
                    "video": {"fps": 29.97, "status": "NOT_A_STATUS"}
                }
            })))
            .mount(&server)
            .await;

        let item = MediaItem::from_id(client_for(&server), "vid1").await.unwrap();

        assert!(item.is_video());
        let metadata = item.media_metadata.unwrap();
        assert_eq!(metadata.width, Some(1920));
        assert_eq!(metadata.height, Some(1080));
        assert_eq!(
            metadata.video.unwrap().status,
            VideoProcessingStatus::Unspecified
        );
    }

    #[tokio::test]
    async fn searches_an_album() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/mediaItems:search"))
            .and(body_json(json!({"albumId": "a1", "pageSize": 100})))
            .respond_with(ResponseTemplate::new(200).set_body_json(media_items_page(&["m1"], "")))
            .expect(1)
            .mount(&server)
            .await;

        let request = SearchMediaItemsRequest {
            page_size: Some(100),
            ..SearchMediaItemsRequest::in_album("a1")
        };
        let mut items = MediaItem::search(client_for(&server), request, CancellationToken::new());

        assert_eq!(items.next_item().await.map(|m| m.filename).as_deref(), Some("m1.jpg"));
        assert!(items.next_item().await.is_none());
        assert!(items.error().await.is_none());
    }

    #[tokio::test]
    async fn creates_an_album() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/albums"))
            .and(body_json(json!({"album": {"title": "New one"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "created",
                "title": "New one",
                "isWriteable": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let album = Album::create(client_for(&server), CreateAlbumProps::new("New one"))
            .await
            .unwrap();

        assert_eq!(album.id, "created");
        assert!(album.is_writeable);
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        // Nothing listens on a port that was just released
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = Client::new(reqwest::Client::new())
            .with_base_url(&format!("http://127.0.0.1:{port}"))
            .unwrap();

        let mut albums = Album::list(client, ListAlbumsRequest::default(), CancellationToken::new());

        assert!(albums.next_item().await.is_none());
        assert!(matches!(
            albums.error().await,
            Some(PhotosError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn html_error_page_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/albums"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let mut albums = Album::list(
            client_for(&server),
            ListAlbumsRequest::default(),
            CancellationToken::new(),
        );

        assert!(albums.next_item().await.is_none());
        assert!(matches!(albums.error().await, Some(PhotosError::Decode(_))));
    }

    #[tokio::test]
    async fn shared_client_runs_concurrent_paginations() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/albums"))
            .respond_with(ResponseTemplate::new(200).set_body_json(albums_page(&["a1", "a2"], "")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/mediaItems"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(media_items_page(&["m1", "m2", "m3"], "")),
            )
            .mount(&server)
            .await;
        let client = client_for(&server);
        let cancel = CancellationToken::new();

        let mut albums = Album::list(client.clone(), ListAlbumsRequest::default(), cancel.clone());
        let mut items = MediaItem::list(client, Default::default(), cancel);
        let (album_count, item_count) = tokio::join!(
            async {
                let mut n = 0;
                while albums.next_item().await.is_some() {
                    n += 1;
                }
                n
            },
            async {
                let mut n = 0;
                while items.next_item().await.is_some() {
                    n += 1;
                }
                n
            }
        );

        assert_eq!((album_count, item_count), (2, 3));
    }

    fn media_item(base_url: &str, mime_type: &str, video: bool) -> MediaItem {
        let metadata = if video {
            json!({"video": {"fps": 30.0, "status": "READY"}})
        } else {
            json!({"photo": {}})
        };
        serde_json::from_value(json!({
            "id": "m1",
            "baseUrl": base_url,
            "mimeType": mime_type,
            "mediaMetadata": metadata
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn downloads_photos_and_videos() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lh/photo=d"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg-bytes".to_vec()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/lh/clip=dv"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp4-bytes".to_vec()))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server);

        let photo = media_item(&format!("{}/lh/photo", server.uri()), "image/jpeg", false);
        let video = media_item(&format!("{}/lh/clip", server.uri()), "video/mp4", true);

        assert_eq!(&photo.download(client.clone()).await.unwrap()[..], b"jpeg-bytes");
        assert_eq!(&video.download(client).await.unwrap()[..], b"mp4-bytes");
    }

    #[tokio::test]
    async fn refused_download_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("expired"))
            .mount(&server)
            .await;
        let client = client_for(&server);

        let expired = media_item(&format!("{}/lh/old", server.uri()), "image/jpeg", false);
        assert!(matches!(
            expired.download(client.clone()).await,
            Err(PhotosError::Transport(_))
        ));

        let missing = media_item("", "image/jpeg", false);
        assert!(matches!(
            missing.download(client).await,
            Err(PhotosError::InvalidRequest(_))
        ));
    }
}
