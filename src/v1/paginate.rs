/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! Page-by-page consumption of the list and search endpoints.
//!
//! [`paginate`] spawns one background task per call. The task fetches a page, hands its items
//! over one at a time through a single-slot channel and moves on to the next page only after
//! the consumer took every item of the current one. The first failed fetch ends the
//! pagination and is reported once through the error slot of the returned [`PageStream`].
//! Cancelling the token ends it silently.
//!
//! ```rust,no_run
//! use photoslibrary::v1::{Album, Client, ListAlbumsRequest};
//! use tokio_util::sync::CancellationToken;
//!
//! async fn print_albums(client: Client) -> Result<(), photoslibrary::v1::PhotosError> {
//!     let cancel = CancellationToken::new();
//!     let mut albums = Album::list(client, ListAlbumsRequest::default(), cancel);
//!     while let Some(album) = albums.next_item().await {
//!         println!("{}", album.title);
//!     }
//!     match albums.error().await {
//!         Some(err) => Err(err),
//!         None => Ok(()),
//!     }
//! }
//! ```

use crate::v1::errors::PhotosError;
use crate::v1::page::{PageItem, fetch_page};
use crate::v1::{Client, Page, PageRequest};
use async_stream::try_stream;
use futures::Stream;
use log::{debug, warn};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

/// How a pagination run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Last page emitted
    Done,
    /// A fetch failed and the error was handed to the error slot
    Failed,
    /// The cancellation token fired
    Cancelled,
    /// The consumer dropped its receiver
    Abandoned,
}

/// Starts paginating `request` in the background.
///
/// `request` is copied; a non-empty page token resumes from that page. The returned stream
/// yields items in server order. `cancel` is observed but never cancelled by the driver itself;
/// dropping or closing the returned stream stops the driver without affecting `cancel`.
///
/// Must be called from within a Tokio runtime.
pub fn paginate<R: PageRequest>(
    client: Client,
    request: R,
    cancel: CancellationToken,
) -> PageStream<PageItem<R>> {
    let cancel = cancel.child_token();
    let (items_tx, items_rx) = mpsc::channel(1);
    let (error_tx, error_rx) = oneshot::channel();
    let (waiting_tx, waiting_rx) = watch::channel(false);

    let driver = Driver {
        client,
        request,
        cancel: cancel.clone(),
        items: items_tx,
        waiting: waiting_tx,
    };
    let task = tokio::spawn(async move {
        let outcome = driver.run(error_tx).await;
        debug!("pagination of {} finished: {:?}", R::PATH, outcome);
    });

    PageStream {
        items: items_rx,
        error: Some(error_rx),
        waiting: waiting_rx,
        cancel: cancel.clone(),
        task,
        _guard: cancel.drop_guard(),
    }
}

struct Driver<R: PageRequest> {
    client: Client,
    request: R,
    cancel: CancellationToken,
    items: mpsc::Sender<PageItem<R>>,
    // True while parked until the consumer takes the item in the slot
    waiting: watch::Sender<bool>,
}

impl<R: PageRequest> Driver<R> {
    /// Waits for the item slot to be free
    async fn reserve(&self) -> Result<mpsc::Permit<'_, PageItem<R>>, Outcome> {
        match self.items.try_reserve() {
            Ok(permit) => return Ok(permit),
            Err(TrySendError::Closed(())) => return Err(Outcome::Abandoned),
            Err(TrySendError::Full(())) => {}
        }

        self.waiting.send_replace(true);
        let reserved = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Outcome::Cancelled),
            permit = self.items.reserve() => permit.map_err(|_| Outcome::Abandoned),
        };
        self.waiting.send_replace(false);
        reserved
    }

    async fn run(mut self, error_tx: oneshot::Sender<PhotosError>) -> Outcome {
        if !self.request.page_token().is_empty() {
            debug!(
                "resuming pagination of {} from page token {:?}",
                R::PATH,
                self.request.page_token()
            );
        }

        let mut page_count: u64 = 0;
        loop {
            if self.cancel.is_cancelled() {
                return Outcome::Cancelled;
            }

            let fetched = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Outcome::Cancelled,
                fetched = fetch_page(&self.client, &self.request) => fetched,
            };

            let Page {
                items,
                next_page_token,
            } = match fetched {
                Ok(page) => page,
                // A fetch that failed because we were shutting down is not reported
                Err(_) if self.cancel.is_cancelled() => return Outcome::Cancelled,
                Err(err) => {
                    warn!("fetching page {} of {} failed: {}", page_count, R::PATH, err);
                    let _ = error_tx.send(err);
                    return Outcome::Failed;
                }
            };
            page_count += 1;

            for item in items {
                if self.cancel.is_cancelled() {
                    return Outcome::Cancelled;
                }
                match self.reserve().await {
                    Ok(permit) => permit.send(item),
                    Err(outcome) => return outcome,
                }
            }

            if next_page_token.is_empty() {
                return Outcome::Done;
            }
            // The next fetch starts only once the consumer took the last item of this page
            if let Err(outcome) = self.reserve().await {
                return outcome;
            }
            if self.cancel.is_cancelled() {
                return Outcome::Cancelled;
            }
            // No cycle detection: a server repeating a token keeps us fetching
            self.request.set_page_token(next_page_token);
        }
    }
}

/// Items produced by a running pagination, paired with its error slot.
///
/// Read items with [`PageStream::next_item`] until it returns `None`, then call
/// [`PageStream::error`] to learn whether the run failed. Once the cancellation token passed
/// to [`paginate`] fires, no further items are observed, and only an error the run hit before
/// the cancellation is reported.
pub struct PageStream<T> {
    items: mpsc::Receiver<T>,
    error: Option<oneshot::Receiver<PhotosError>>,
    waiting: watch::Receiver<bool>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
    _guard: DropGuard,
}

impl<T> PageStream<T> {
    /// Waits for the next item. `None` once the pagination ended or was cancelled.
    pub async fn next_item(&mut self) -> Option<T> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            item = self.items.recv() => item,
        }
    }

    /// Returns the error that ended the pagination, if any.
    ///
    /// After `next_item` returned `None` this resolves once the driver stopped, and only the
    /// first such call can return the error. A run that was cancelled yields `None` unless it
    /// had already failed. Called while items are still unread, it returns `None` as soon as
    /// the driver waits for them to be taken; a later call can still report a failure.
    pub async fn error(&mut self) -> Option<PhotosError> {
        let mut error_rx = self.error.take()?;
        match error_rx.try_recv() {
            Ok(err) => return Some(err),
            Err(oneshot::error::TryRecvError::Closed) => return None,
            Err(oneshot::error::TryRecvError::Empty) => {}
        }

        let mut waiting = self.waiting.clone();
        tokio::select! {
            biased;
            err = &mut error_rx => err.ok(),
            // The driver never reports an error once it saw the cancellation
            _ = self.cancel.cancelled() => error_rx.try_recv().ok(),
            parked = waiting.wait_for(|waiting| *waiting) => {
                if parked.is_err() {
                    // Driver is gone, so the slot is settled
                    return error_rx.try_recv().ok();
                }
                drop(parked);
                self.error = Some(error_rx);
                None
            }
        }
    }

    /// True once the cancellation token fired or the stream was closed
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stops the driver and waits for its task to exit
    pub async fn close(self) {
        let PageStream {
            items,
            cancel,
            task,
            _guard,
            ..
        } = self;
        cancel.cancel();
        drop(items);
        if let Err(err) = task.await {
            warn!("pagination task did not exit cleanly: {err}");
        }
    }

    /// Adapts the pagination into a stream of results.
    ///
    /// Yields every item, then the error that ended the run if there was one.
    pub fn into_stream(mut self) -> impl Stream<Item = Result<T, PhotosError>> {
        try_stream! {
            while let Some(item) = self.next_item().await {
                yield item;
            }
            if let Some(err) = self.error().await {
                Err::<(), PhotosError>(err)?;
            }
        }
    }
}

impl<T> std::fmt::Debug for PageStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageStream")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
