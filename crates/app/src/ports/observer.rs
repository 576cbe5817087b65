//! Button observer port: application callbacks for button notifications.

use serde::Deserialize;

use crate::ports::transport::TransportError;

/// Receives button transitions from a standing observation.
///
/// The façade only keeps a weak reference: the caller owns the observer and
/// decides how long it lives.
pub trait ButtonObserver: Send + Sync {
    /// The button went down (any notification body other than `"0"`).
    fn on_pressed(&self);

    /// The button went up (notification body `"0"`).
    fn on_released(&self);

    /// The observation failed to register or reported an error response.
    ///
    /// Only called under [`ObserveErrorPolicy::Notify`].
    fn on_error(&self, _error: &TransportError) {}
}

/// What to do with errors raised by the button observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObserveErrorPolicy {
    /// Forward errors to [`ButtonObserver::on_error`].
    #[default]
    Notify,
    /// Log and drop errors.
    Ignore,
}
