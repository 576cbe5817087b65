//! OpenMote façade: domain calls mapped onto device resources.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::OnceCell;

use openmote_domain::endpoint::{DEFAULT_PORT, Endpoint, Resource, Resources};
use openmote_domain::error::{ErrorResponseError, OpenMoteError};
use openmote_domain::led::Led;
use openmote_domain::reading::{self, ClimateReading};

use crate::dispatch::{Dispatcher, ObserverSlot};
use crate::ports::{ButtonObserver, ObserveErrorPolicy, Transport, TransportError};

/// Body POSTed to an LED resource to flip its state.
pub const TOGGLE_BODY: &str = "mode=toggle";

/// Client for one OpenMote board.
///
/// Owns one resource handle per logical resource, built at construction
/// and never re-pointed. No IO happens until a method is called.
pub struct OpenMote<T: Transport> {
    transport: T,
    resources: Resources,
    observers: ObserverSlot,
    observe_errors: ObserveErrorPolicy,
    subscription: OnceCell<T::Subscription>,
}

impl<T: Transport> OpenMote<T> {
    /// Create a client for the device at `address` on the default CoAP port.
    ///
    /// # Errors
    ///
    /// Returns [`OpenMoteError::InvalidAddress`] if `address` is not an IP
    /// literal.
    pub fn new(address: &str, transport: T) -> Result<Self, OpenMoteError> {
        Self::with_port(address, DEFAULT_PORT, transport)
    }

    /// Create a client for the device at `address`:`port`.
    ///
    /// # Errors
    ///
    /// Returns [`OpenMoteError::InvalidAddress`] if `address` is not an IP
    /// literal.
    pub fn with_port(address: &str, port: u16, transport: T) -> Result<Self, OpenMoteError> {
        let endpoint = Endpoint::parse(address, port)?;
        Ok(Self {
            transport,
            resources: Resources::for_endpoint(endpoint),
            observers: ObserverSlot::default(),
            observe_errors: ObserveErrorPolicy::default(),
            subscription: OnceCell::new(),
        })
    }

    /// Choose how button observation errors are handled.
    #[must_use]
    pub fn with_observe_errors(mut self, policy: ObserveErrorPolicy) -> Self {
        self.observe_errors = policy;
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        self.resources.ping().endpoint()
    }

    #[must_use]
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Whether the button observation has been armed.
    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.subscription.initialized()
    }

    /// Probe the device. Returns `false` on timeout, never errors.
    #[tracing::instrument(skip(self), fields(endpoint = %self.endpoint()))]
    pub async fn ping(&self, timeout: Duration) -> bool {
        let alive = self.transport.ping(self.resources.ping(), timeout).await;
        tracing::debug!(alive, "ping finished");
        alive
    }

    /// Toggle an LED. Delivery failures are logged, not returned.
    #[tracing::instrument(skip(self), fields(endpoint = %self.endpoint()))]
    pub async fn toggle_led(&self, led: Led) {
        let resource = self.resources.led(led);
        if let Err(err) = self.transport.post(resource, TOGGLE_BODY).await {
            tracing::warn!(%err, %resource, "LED toggle not delivered");
        }
    }

    /// Read temperature and humidity from a single SHT21 exchange.
    ///
    /// Returns `Ok(None)` when the device does not answer.
    ///
    /// # Errors
    ///
    /// Returns [`OpenMoteError::ErrorResponse`] if the device answers with an
    /// error code, [`OpenMoteError::MalformedResponse`] if the body is not
    /// `"<int>;<int>"`.
    #[tracing::instrument(skip(self), fields(endpoint = %self.endpoint()))]
    pub async fn sense_climate(&self) -> Result<Option<ClimateReading>, OpenMoteError> {
        let Some(body) = self.read(self.resources.sht21()).await? else {
            return Ok(None);
        };
        Ok(Some(reading::parse_climate(&body)?))
    }

    /// Temperature in °C. Each call is an independent exchange.
    ///
    /// # Errors
    ///
    /// See [`sense_climate`](Self::sense_climate).
    pub async fn sense_temperature(&self) -> Result<Option<f64>, OpenMoteError> {
        Ok(self.sense_climate().await?.map(|r| r.temperature))
    }

    /// Relative humidity in %. Each call is an independent exchange.
    ///
    /// # Errors
    ///
    /// See [`sense_climate`](Self::sense_climate).
    pub async fn sense_humidity(&self) -> Result<Option<f64>, OpenMoteError> {
        Ok(self.sense_climate().await?.map(|r| r.humidity))
    }

    /// Ambient light from the MAX44009.
    ///
    /// Returns `Ok(None)` when the device does not answer.
    ///
    /// # Errors
    ///
    /// Returns [`OpenMoteError::ErrorResponse`] if the device answers with an
    /// error code, [`OpenMoteError::MalformedResponse`] if the body is not a
    /// number.
    #[tracing::instrument(skip(self), fields(endpoint = %self.endpoint()))]
    pub async fn sense_light(&self) -> Result<Option<f64>, OpenMoteError> {
        let Some(body) = self.read(self.resources.max44009()).await? else {
            return Ok(None);
        };
        Ok(Some(reading::parse_light(&body)?))
    }

    /// Register `observer` for button presses, replacing any previous one.
    ///
    /// The first call arms the observation on `sensors/button`; later calls
    /// only swap the observer. Only a weak reference is kept, so the caller
    /// must hold on to `observer`. If arming fails the error goes to the
    /// observer (per the configured policy) and the next call retries.
    #[tracing::instrument(skip(self, observer), fields(endpoint = %self.endpoint()))]
    pub async fn register_for_button_presses<O>(&self, observer: &Arc<O>)
    where
        O: ButtonObserver + 'static,
    {
        let weak: Weak<O> = Arc::downgrade(observer);
        self.observers.replace(weak);

        if self.subscription.initialized() {
            tracing::debug!("button observer replaced");
            return;
        }

        let dispatcher = Dispatcher::new(self.observers.clone(), self.observe_errors);
        let handler = dispatcher.clone();
        let armed = self
            .subscription
            .get_or_try_init(|| {
                self.transport
                    .observe(self.resources.button(), move |n| handler.dispatch(n))
            })
            .await;

        match armed {
            Ok(_) => tracing::info!(resource = %self.resources.button(), "button observation armed"),
            Err(err) => {
                tracing::warn!(%err, "failed to arm button observation");
                dispatcher.dispatch_error(&err);
            }
        }
    }

    /// GET a resource. A missing reply is `Ok(None)`; an error code from
    /// the device is an error.
    async fn read(&self, resource: &Resource) -> Result<Option<Vec<u8>>, OpenMoteError> {
        match self.transport.get(resource).await {
            Ok(body) => Ok(Some(body)),
            Err(TransportError::Status(status)) => {
                tracing::warn!(%status, %resource, "device rejected request");
                Err(ErrorResponseError {
                    resource: resource.path().to_string(),
                    status,
                }
                .into())
            }
            Err(err) => {
                tracing::debug!(%err, %resource, "no response");
                Ok(None)
            }
        }
    }
}
