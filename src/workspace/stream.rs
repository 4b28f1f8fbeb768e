//! Response body stream backed by a scratch file

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Bytes;
use futures::future::BoxFuture;
use futures::{ready, Stream};
use tokio_util::io::ReaderStream;

use super::ScratchFile;

/// Streams a scratch file's contents and releases the file afterwards.
///
/// Once the reader reaches EOF or fails, the file is released before the
/// final item is yielded. If the stream is dropped first (client went away
/// mid-transfer), the release happens on drop instead.
pub struct ScratchFileStream {
    reader: ReaderStream<tokio::fs::File>,
    file: Option<ScratchFile>,
    releasing: Option<BoxFuture<'static, ()>>,
    last: Option<Option<io::Result<Bytes>>>,
}

impl ScratchFileStream {
    /// Open `file` for reading and take ownership of its release.
    pub async fn open(file: ScratchFile) -> io::Result<Self> {
        let handle = match tokio::fs::File::open(file.path()).await {
            Ok(handle) => handle,
            Err(e) => {
                file.release().await;
                return Err(e);
            }
        };

        Ok(Self {
            reader: ReaderStream::new(handle),
            file: Some(file),
            releasing: None,
            last: None,
        })
    }
}

impl Stream for ScratchFileStream {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            if let Some(release) = this.releasing.as_mut() {
                ready!(release.as_mut().poll(cx));
                this.releasing = None;
                return Poll::Ready(this.last.take().flatten());
            }

            match ready!(Pin::new(&mut this.reader).poll_next(cx)) {
                Some(Ok(chunk)) => return Poll::Ready(Some(Ok(chunk))),
                end => match this.file.take() {
                    Some(file) => {
                        this.releasing = Some(Box::pin(file.release()));
                        this.last = Some(end);
                    }
                    None => return Poll::Ready(end),
                },
            }
        }
    }
}
