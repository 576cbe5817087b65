//! Device endpoint and resource handles.
//!
//! An [`Endpoint`] is the base locator of the device (`coap://[addr]:port/`).
//! A [`Resource`] pairs an endpoint with a fixed path and optional query.
//! [`Resources`] builds the complete, immutable set of handles the OpenMote
//! firmware exposes, one per logical resource.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::error::InvalidAddressError;
use crate::led::Led;

/// Default CoAP UDP port.
pub const DEFAULT_PORT: u16 = 5683;

/// Path of the combined temperature/humidity sensor.
pub const SHT21_PATH: &str = "sensors/sht21";
/// Path of the ambient light sensor.
pub const MAX44009_PATH: &str = "sensors/max44009";
/// Path of the observable user button.
pub const BUTTON_PATH: &str = "sensors/button";
/// Path shared by the three LEDs (selected by query).
pub const LEDS_PATH: &str = "actuators/leds";

/// Base network locator of the device. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    addr: SocketAddr,
}

impl Endpoint {
    /// Build an endpoint from a textual IP address and a port.
    ///
    /// IPv6 literals are the normal case for 6LoWPAN motes; IPv4 is accepted
    /// too so that the client can be pointed at a local simulator.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAddressError`] if `address` is not an IP literal.
    pub fn parse(address: &str, port: u16) -> Result<Self, InvalidAddressError> {
        let ip: IpAddr = address.trim().parse().map_err(|_| InvalidAddressError {
            input: address.to_string(),
        })?;
        Ok(Self {
            addr: SocketAddr::new(ip, port),
        })
    }

    /// Socket address of the device.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Device IP address.
    #[must_use]
    pub fn ip(&self) -> IpAddr {
        self.addr.ip()
    }

    /// Device port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

impl fmt::Display for Endpoint {
    // SocketAddr already brackets IPv6 literals.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "coap://{}/", self.addr)
    }
}

/// One addressable resource on the device.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    endpoint: Endpoint,
    path: &'static str,
    query: Option<&'static str>,
}

impl Resource {
    /// The device root, used for liveness probes.
    #[must_use]
    pub fn root(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            path: "",
            query: None,
        }
    }

    /// A resource at `path` with no query.
    #[must_use]
    pub fn new(endpoint: Endpoint, path: &'static str) -> Self {
        Self {
            endpoint,
            path,
            query: None,
        }
    }

    /// A resource at `path` selected by `query` (e.g. `color=r`).
    #[must_use]
    pub fn with_query(endpoint: Endpoint, path: &'static str, query: &'static str) -> Self {
        Self {
            endpoint,
            path,
            query: Some(query),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Path relative to the endpoint, without a leading slash.
    #[must_use]
    pub fn path(&self) -> &'static str {
        self.path
    }

    #[must_use]
    pub fn query(&self) -> Option<&'static str> {
        self.query
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.endpoint, self.path)?;
        if let Some(query) = self.query {
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

/// The full set of resource handles for one device.
///
/// Built once per façade; handles are never re-created or re-pointed.
#[derive(Debug, Clone)]
pub struct Resources {
    ping: Resource,
    leds: [Resource; 3],
    sht21: Resource,
    max44009: Resource,
    button: Resource,
}

impl Resources {
    /// Build every handle rooted at `endpoint`.
    #[must_use]
    pub fn for_endpoint(endpoint: Endpoint) -> Self {
        let led = |led: Led| Resource::with_query(endpoint, LEDS_PATH, led.color_query());

        Self {
            ping: Resource::root(endpoint),
            leds: Led::ALL.map(led),
            sht21: Resource::new(endpoint, SHT21_PATH),
            max44009: Resource::new(endpoint, MAX44009_PATH),
            button: Resource::new(endpoint, BUTTON_PATH),
        }
    }

    #[must_use]
    pub fn ping(&self) -> &Resource {
        &self.ping
    }

    /// Handle for the given LED.
    #[must_use]
    pub fn led(&self, led: Led) -> &Resource {
        &self.leds[led.index()]
    }

    #[must_use]
    pub fn sht21(&self) -> &Resource {
        &self.sht21
    }

    #[must_use]
    pub fn max44009(&self) -> &Resource {
        &self.max44009
    }

    #[must_use]
    pub fn button(&self) -> &Resource {
        &self.button
    }

    /// Iterate over every handle.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        [&self.ping, &self.sht21, &self.max44009, &self.button]
            .into_iter()
            .chain(self.leds.iter())
    }
}
