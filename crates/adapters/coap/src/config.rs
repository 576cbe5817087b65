//! CoAP transport configuration.

use std::time::Duration;

use serde::Deserialize;

use openmote_app::ports::ObserveErrorPolicy;

/// Configuration for the CoAP transport.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoapConfig {
    /// How long a GET/POST may take before it counts as "no response", in
    /// milliseconds.
    pub request_timeout_ms: u64,
    /// Default liveness-probe timeout, in milliseconds.
    pub ping_timeout_ms: u64,
    /// What to do with button observation errors.
    pub observe_errors: ObserveErrorPolicy,
}

impl CoapConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    #[must_use]
    pub fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_timeout_ms)
    }
}

impl Default for CoapConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 5_000,
            ping_timeout_ms: 2_000,
            observe_errors: ObserveErrorPolicy::Notify,
        }
    }
}
