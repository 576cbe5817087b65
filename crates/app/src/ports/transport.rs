//! Transport port: a single exchange against one device resource.
//!
//! The CoAP message layer (retransmission, token matching, observe
//! bookkeeping) lives entirely behind this trait. The façade only picks the
//! resource and the verb.

use std::future::Future;
use std::time::Duration;

use openmote_domain::endpoint::Resource;

/// One notification delivered on a standing observation: the body of a
/// successful notification, or the error the transport reported.
pub type Notification = Result<Vec<u8>, TransportError>;

/// Errors a transport can report for a single exchange.
///
/// [`Timeout`](Self::Timeout) and [`Io`](Self::Io) both mean "no response"
/// from the façade's point of view.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No reply arrived before the deadline.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// The socket failed.
    #[error("transport I/O error")]
    Io(#[from] std::io::Error),

    /// The device replied with a non-success response code.
    #[error("device answered with {0}")]
    Status(String),

    /// An adapter-specific failure.
    #[error("transport adapter error")]
    Adapter(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Executes exchanges against device resources.
///
/// Implementations live in adapter crates (e.g. `adapter_coap`). Every
/// exchange must complete, successfully or not, within the transport's own
/// request timeout; the façade never waits on its own.
pub trait Transport: Send + Sync {
    /// Handle that keeps a standing observation alive. Dropping it may end
    /// the observation.
    type Subscription: Send + Sync + 'static;

    /// Liveness probe. `true` iff the device replied within `timeout`.
    fn ping(&self, resource: &Resource, timeout: Duration) -> impl Future<Output = bool> + Send;

    /// GET the resource and return the response body.
    fn get(
        &self,
        resource: &Resource,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;

    /// POST a `text/plain` body to the resource.
    fn post(
        &self,
        resource: &Resource,
        body: &str,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Register a standing observation on the resource.
    ///
    /// `handler` is invoked for every notification, possibly from another
    /// task than the caller's.
    fn observe<H>(
        &self,
        resource: &Resource,
        handler: H,
    ) -> impl Future<Output = Result<Self::Subscription, TransportError>> + Send
    where
        H: FnMut(Notification) + Send + 'static;
}
