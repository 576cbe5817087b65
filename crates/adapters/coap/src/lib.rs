//! # openmote-adapter-coap
//!
//! CoAP adapter. Executes the façade's exchanges against an `OpenMote`
//! over UDP, using `coap` for confirmable request/response and observe,
//! and `coap-lite` for message construction.
//!
//! ## Exchanges
//!
//! | Operation | Message | Notes |
//! |-----------|---------|-------|
//! | ping | empty CON | any RST/ACK with the same message ID counts |
//! | get | CON GET | body of a 2.xx response |
//! | post | CON POST, `text/plain` | 2.xx response required |
//! | observe | GET + Observe=0 | one notification per button transition |
//!
//! Error response codes are surfaced as [`TransportError::Status`]; a
//! missing reply as [`TransportError::Timeout`].
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `openmote-app` and `openmote-domain`.

mod config;
mod error;
pub mod message;
mod ping;

pub use config::CoapConfig;
pub use error::CoapError;

use std::future::Future;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use coap::UdpCoAPClient;
use coap::client::ObserveMessage;
use coap_lite::RequestType as Method;
use tokio::sync::oneshot;

use openmote_app::ports::{Notification, Transport, TransportError};
use openmote_domain::endpoint::Resource;

/// [`Transport`] implementation speaking CoAP over UDP.
pub struct CoapTransport {
    config: CoapConfig,
    next_message_id: AtomicU16,
}

impl CoapTransport {
    #[must_use]
    pub fn new(config: CoapConfig) -> Self {
        Self {
            config,
            next_message_id: AtomicU16::new(initial_message_id()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CoapConfig {
        &self.config
    }

    fn message_id(&self) -> u16 {
        self.next_message_id.fetch_add(1, Ordering::Relaxed)
    }

    async fn client(&self, resource: &Resource) -> Result<UdpCoAPClient, CoapError> {
        let mut client = UdpCoAPClient::new_udp(resource.endpoint().socket_addr()).await?;
        client.set_receive_timeout(self.config.request_timeout());
        Ok(client)
    }

    async fn exchange(
        &self,
        resource: &Resource,
        method: Method,
        body: Option<&str>,
    ) -> Result<Vec<u8>, CoapError> {
        let timeout = self.config.request_timeout();
        let client = self.client(resource).await?;
        let request = message::build_request(resource, method, body);

        let response = tokio::time::timeout(timeout, client.send(request))
            .await
            .map_err(|_| CoapError::Timeout(timeout))?
            .map_err(|err| CoapError::from_io(err, timeout))?;

        message::response_body(response)
    }
}

impl Default for CoapTransport {
    fn default() -> Self {
        Self::new(CoapConfig::default())
    }
}

impl Transport for CoapTransport {
    type Subscription = CoapSubscription;

    fn ping(&self, resource: &Resource, timeout: Duration) -> impl Future<Output = bool> + Send {
        let target = resource.endpoint().socket_addr();
        let message_id = self.message_id();
        async move {
            match ping::ping(target, message_id, timeout).await {
                Ok(alive) => {
                    tracing::debug!(%target, alive, "ping finished");
                    alive
                }
                Err(err) => {
                    tracing::debug!(%target, %err, "ping failed");
                    false
                }
            }
        }
    }

    fn get(
        &self,
        resource: &Resource,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send {
        async move {
            let body = self.exchange(resource, Method::Get, None).await?;
            tracing::trace!(%resource, len = body.len(), "GET answered");
            Ok(body)
        }
    }

    fn post(
        &self,
        resource: &Resource,
        body: &str,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        async move {
            self.exchange(resource, Method::Post, Some(body)).await?;
            tracing::trace!(%resource, "POST answered");
            Ok(())
        }
    }

    fn observe<H>(
        &self,
        resource: &Resource,
        mut handler: H,
    ) -> impl Future<Output = Result<CoapSubscription, TransportError>> + Send
    where
        H: FnMut(Notification) + Send + 'static,
    {
        async move {
            let timeout = self.config.request_timeout();
            let client = self.client(resource).await?;
            let stop = client
                .observe(resource.path(), move |packet| {
                    handler(message::notification(packet));
                })
                .await
                .map_err(|err| CoapError::from_io(err, timeout))?;

            tracing::info!(%resource, "observation registered");
            Ok(CoapSubscription { stop: Some(stop) })
        }
    }
}

/// Keeps a CoAP observation running. Dropping it deregisters.
pub struct CoapSubscription {
    stop: Option<oneshot::Sender<ObserveMessage>>,
}

impl Drop for CoapSubscription {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            // The observe task may already be gone.
            let _ = stop.send(ObserveMessage::Terminate);
        }
    }
}

fn initial_message_id() -> u16 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.subsec_nanos());
    u16::try_from(nanos >> 16).unwrap_or_default()
}
