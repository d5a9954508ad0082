//! The request driver shared by every backend.
//!
//! `exchange` sends a prepared body through a [`Dispatcher`], runs the
//! response through the adapter's reassembler and extractor, and folds the
//! resulting events into one [`AiResponse`]. Cancellation is checked before
//! every read; once it fires the stream is dropped and nothing more is
//! parsed.

use crate::{
    Adapter, AiResponse, Cancelled, Dispatcher, Error, Events, Frame, Reassembler,
    ResponseAccumulator, StatusPolicy, StreamEvent,
};
use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;
use serde_json::Value;
use smallvec::smallvec;
use std::{pin::pin, time::Duration};
use tokio_util::sync::CancellationToken;

/// Callbacks fired while a response streams in.
pub trait Observer {
    /// Called once per text or tool-call delta, in arrival order.
    fn on_streaming_text_received(&mut self, _text: &str) {}

    /// Called exactly once when a stream ends cleanly. Never called for
    /// cancelled or failed requests.
    fn on_streaming_complete(&mut self) {}
}

impl Observer for () {}

/// Run one request to completion.
///
/// Transport, status and parse failures come back as a failed
/// `AiResponse`; only cancellation is reported as an error.
pub async fn exchange<A: Adapter + ?Sized>(
    adapter: &A,
    dispatcher: &Dispatcher,
    body: &Value,
    streaming: bool,
    timeout: Duration,
    cancel: &CancellationToken,
    observer: &mut impl Observer,
) -> Result<AiResponse, Cancelled> {
    if streaming {
        stream(adapter, dispatcher, body, timeout, cancel, observer).await
    } else {
        single(adapter, dispatcher, body, timeout, cancel).await
    }
}

async fn stream<A: Adapter + ?Sized>(
    adapter: &A,
    dispatcher: &Dispatcher,
    body: &Value,
    timeout: Duration,
    cancel: &CancellationToken,
    observer: &mut impl Observer,
) -> Result<AiResponse, Cancelled> {
    let mut acc = ResponseAccumulator::new(adapter.usage_reporting());
    let mut events = pin!(events(adapter, dispatcher, body, timeout));
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("{} request cancelled", adapter.kind());
                return Err(Cancelled::new(acc.cancelled()));
            }
            next = events.next() => next,
        };

        let event = match next {
            Some(Ok(event)) => event,
            Some(Err(e)) => {
                tracing::warn!("{} request failed: {e}", adapter.kind());
                return Ok(AiResponse::failure(&e));
            }
            None => break,
        };

        if let Some(text) = event.text() {
            observer.on_streaming_text_received(text);
        }
        acc.accept(&event);
        if acc.is_done() {
            break;
        }
    }

    observer.on_streaming_complete();
    Ok(acc.finish())
}

/// Streamed response as normalized events.
///
/// Ends with an error when the status check fails or when the stream
/// produced no usable fragment at all.
fn events<'a, A: Adapter + ?Sized>(
    adapter: &'a A,
    dispatcher: &'a Dispatcher,
    body: &'a Value,
    timeout: Duration,
) -> impl Stream<Item = Result<StreamEvent, Error>> + 'a {
    try_stream! {
        let response = dispatcher.open(body, timeout).await?;
        let status = response.status();
        let response = if !status.is_success() && adapter.status_policy() == StatusPolicy::Strict {
            let context = response.text().await.unwrap_or_default();
            Err(Error::Status { status: status.as_u16(), context })
        } else {
            Ok(response)
        }?;

        let mut reassembler = Reassembler::new(adapter.framing());
        let mut usable = 0usize;
        let mut bytes = response.bytes_stream();
        while let Some(chunk) = bytes.next().await {
            let chunk = chunk?;
            tracing::trace!("chunk: {}", String::from_utf8_lossy(&chunk));
            for frame in reassembler.feed(&chunk) {
                usable += 1;
                for event in frame_events(adapter, frame) {
                    yield event;
                }
            }
        }
        for frame in reassembler.finish() {
            usable += 1;
            for event in frame_events(adapter, frame) {
                yield event;
            }
        }

        if !status.is_success() {
            let context = format!("Response leftovers: {}", reassembler.leftover());
            Err::<(), _>(Error::Status { status: status.as_u16(), context })?;
        } else if usable == 0 {
            let leftover = reassembler.leftover().to_owned();
            Err::<(), _>(Error::EmptyStream { leftover })?;
        }
    }
}

fn frame_events<A: Adapter + ?Sized>(adapter: &A, frame: Frame) -> Events {
    match frame {
        Frame::Json(value) => adapter.extract_chunk(&value),
        Frame::Done => smallvec![StreamEvent::Done],
    }
}

async fn single<A: Adapter + ?Sized>(
    adapter: &A,
    dispatcher: &Dispatcher,
    body: &Value,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<AiResponse, Cancelled> {
    let mut acc = ResponseAccumulator::new(adapter.usage_reporting());
    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!("{} request cancelled", adapter.kind());
            return Err(Cancelled::new(acc.cancelled()));
        }
        result = document(adapter, dispatcher, body, timeout) => result,
    };

    match result {
        Ok(events) => {
            for event in &events {
                acc.accept(event);
            }
            Ok(acc.finish())
        }
        Err(e) => {
            tracing::warn!("{} request failed: {e}", adapter.kind());
            Ok(AiResponse::failure(&e))
        }
    }
}

async fn document<A: Adapter + ?Sized>(
    adapter: &A,
    dispatcher: &Dispatcher,
    body: &Value,
    timeout: Duration,
) -> Result<Events, Error> {
    let response = dispatcher.send(body, timeout).await?;
    let status = response.status();
    let text = response.text().await?;
    tracing::trace!("response: {text}");
    if !status.is_success() {
        return Err(Error::Status {
            status: status.as_u16(),
            context: text,
        });
    }

    let document = serde_json::from_str::<Value>(&text).map_err(|source| Error::Parse {
        source,
        body: text.clone(),
    })?;
    Ok(adapter.extract_document(&document))
}
