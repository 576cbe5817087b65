//! # openmote-domain
//!
//! Pure domain model for the OpenMote demo client.
//!
//! ## Responsibilities
//! - Describe **where** the device lives ([`endpoint::Endpoint`]) and which
//!   **resources** it exposes ([`endpoint::Resource`])
//! - Name the device's actuators ([`led::Led`])
//! - Decode the textual payloads the firmware sends back
//!   ([`reading::ClimateReading`], [`button::ButtonState`])
//! - Define the error conventions shared by every layer
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or IO crates.
//! The transport boundary is expressed as a trait in the `app` crate (port).

pub mod button;
pub mod endpoint;
pub mod error;
pub mod led;
pub mod reading;
