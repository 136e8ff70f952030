//! Outbound request plumbing.
//!
//! A [`QueryTransport`] performs the single suspending operation of a
//! submission. [`run_query`] drives one submission end to end against a page
//! controller without holding its borrow across the await, so a newer
//! submission can start while an older request is still in flight.
//! [`begin_query`] and [`finish_query`] are its two halves, for callers that
//! must reach `Loading` inside the triggering event handler.

#[cfg(not(target_arch = "wasm32"))]
pub mod http;

use std::cell::RefCell;
use std::future::Future;

use protocol::{QueryRequest, QueryResponse, ResponseError};
use tracing::debug;

use crate::controller::PageController;
use crate::query::{QueryTicket, Resolution};
use crate::views::{MapView, Notifier, ResultsView};

#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Connection, DNS, TLS or body read failure.
    Network(String),
    /// Non-2xx response status.
    Status(u16),
    /// 2xx response whose top-level body could not be decoded.
    Decode(ResponseError),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Network(msg) => write!(f, "network error: {msg}"),
            TransportError::Status(code) => write!(f, "service returned status {code}"),
            TransportError::Decode(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResponseError> for TransportError {
    fn from(err: ResponseError) -> Self {
        TransportError::Decode(err)
    }
}

/// Sends one query to the answering service.
///
/// Implementations must resolve every failure to `Err`; they never retry.
pub trait QueryTransport {
    fn send(
        &self,
        request: QueryRequest,
    ) -> impl Future<Output = Result<QueryResponse, TransportError>>;
}

/// Synchronous half of a submission: moves the page to `Loading` right away.
///
/// Returns `None` when the text was blank (nothing changes).
pub fn begin_query<M, R, N>(
    page: &RefCell<PageController<M, R, N>>,
    query_text: &str,
) -> Option<QueryTicket>
where
    M: MapView,
    R: ResultsView,
    N: Notifier,
{
    page.borrow_mut().submit(query_text)
}

/// Sends `ticket` and settles the page with the answer. The page is only
/// borrowed after the transport has resolved.
pub async fn finish_query<T, M, R, N>(
    page: &RefCell<PageController<M, R, N>>,
    transport: &T,
    ticket: QueryTicket,
) -> Resolution
where
    T: QueryTransport,
    M: MapView,
    R: ResultsView,
    N: Notifier,
{
    debug!(generation = %ticket.generation, "query request sent");
    let outcome = transport.send(ticket.request).await;
    page.borrow_mut().complete(ticket.generation, outcome)
}

/// Submits `query_text` and settles the page with the transport's answer.
///
/// Returns `None` when the text was blank (nothing was sent).
pub async fn run_query<T, M, R, N>(
    page: &RefCell<PageController<M, R, N>>,
    transport: &T,
    query_text: &str,
) -> Option<Resolution>
where
    T: QueryTransport,
    M: MapView,
    R: ResultsView,
    N: Notifier,
{
    let ticket = begin_query(page, query_text)?;
    Some(finish_query(page, transport, ticket).await)
}
