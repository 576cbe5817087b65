//! Port definitions: traits that adapters and callers implement.
//!
//! Ports are the boundaries between the façade and the outside world.
//! They are defined here (in `app`) so that both the façade and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod observer;
pub mod transport;

pub use observer::{ButtonObserver, ObserveErrorPolicy};
pub use transport::{Notification, Transport, TransportError};
