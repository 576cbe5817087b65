//! # openmote-app
//!
//! Application layer: the device façade and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters and callers implement:
//!   - `Transport`: one request/response exchange (or a standing
//!     observation) against a device resource
//!   - `ButtonObserver`: application callbacks for button notifications
//! - Provide the **driving** use-case struct `OpenMote`, which maps
//!   domain calls (`ping`, `toggle_led`, `sense_*`,
//!   `register_for_button_presses`) onto resource handles
//! - Turn observed payloads into observer callbacks (`dispatch`)
//!
//! ## Dependency rule
//! Depends on `openmote-domain` only (plus `tokio::sync` for the one-shot
//! subscription cell). Never imports adapter crates. Adapters depend on
//! *this* crate, not the reverse.

pub mod dispatch;
pub mod ports;
pub mod services;
