//! Building a [`Document`] from HTML text or bytes.

mod sink;

use crate::dom::Document;
use crate::error::{ParseError, StreamError};
use bytes::Bytes;
use html5ever::tendril::{ByteTendril, TendrilSink as _};
use html5ever::{ParseOpts, parse_document};
use sink::ArenaSink;
use std::io::Read;
use tokio::sync::mpsc;
use tokio::task;
use tokio_stream::{Stream, StreamExt as _};

impl Document {
    /// Parse a whole document from a reader. Invalid UTF-8 is replaced,
    /// malformed markup is repaired by html5ever; only read failures error.
    pub fn parse<R: Read>(mut reader: R) -> Result<Self, ParseError> {
        let document = parse_document(ArenaSink::new(), ParseOpts::default())
            .from_utf8()
            .read_from(&mut reader)?;
        Ok(document)
    }

    /// Parse a document already held in memory.
    pub fn parse_str(html: &str) -> Self {
        parse_document(ArenaSink::new(), ParseOpts::default()).one(html)
    }

    /// Parse a document from an async byte stream such as an HTTP body.
    ///
    /// Chunks are fed to html5ever on a blocking worker as they arrive, so the
    /// parser never occupies an async thread.
    ///
    /// # Errors
    /// Returns `ParseError::Stream` if the stream yields an error, and
    /// `ParseError::Worker` if the parsing task dies.
    pub async fn from_stream<S, E>(mut byte_stream: S) -> Result<Self, ParseError>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: Into<StreamError>,
    {
        let (tx, mut rx) = mpsc::channel::<Bytes>(64);
        let worker = task::spawn_blocking(move || {
            let mut parser = parse_document(ArenaSink::new(), ParseOpts::default()).from_utf8();
            while let Some(chunk) = rx.blocking_recv() {
                parser.process(ByteTendril::from_slice(&chunk));
            }
            parser.finish()
        });

        while let Some(chunk) = byte_stream.next().await {
            let chunk = chunk.map_err(|err| ParseError::Stream(err.into()))?;
            if tx.send(chunk).await.is_err() {
                break;
            }
        }
        drop(tx);
        worker
            .await
            .map_err(|err| ParseError::Worker(err.to_string()))
    }
}
