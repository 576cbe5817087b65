//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`OpenMoteError`] via `#[from]`. "No response" is deliberately absent
//! here: an unreachable device is an expected condition and is modelled as
//! `Ok(None)` by the façade, not as an error.

/// Top-level error for the OpenMote client.
#[derive(Debug, thiserror::Error)]
pub enum OpenMoteError {
    /// The device address could not be turned into a locator.
    #[error("invalid device address")]
    InvalidAddress(#[from] InvalidAddressError),

    /// The device answered with a body that violates the expected format.
    #[error("malformed response")]
    MalformedResponse(#[from] MalformedResponseError),

    /// The device answered with an error response code.
    #[error("request rejected by device")]
    ErrorResponse(#[from] ErrorResponseError),
}

/// The textual device address could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{input:?} is not a valid IP address")]
pub struct InvalidAddressError {
    /// The rejected input, as given by the caller.
    pub input: String,
}

/// The device replied, but with a 4.xx/5.xx code instead of a reading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{resource} answered with {status}")]
pub struct ErrorResponseError {
    /// Resource the request was sent to.
    pub resource: String,
    /// Response code as reported by the transport.
    pub status: String,
}

/// Details about why a response body could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedResponseError {
    /// The body is not valid UTF-8.
    #[error("{resource} payload is not valid UTF-8")]
    NotUtf8 {
        /// Resource the body was read from (e.g. `"sensors/sht21"`).
        resource: &'static str,
    },

    /// The body does not contain the expected number of `;`-separated fields.
    #[error("{resource} payload must have {expected} fields, got {actual}")]
    FieldCount {
        /// Resource the body was read from.
        resource: &'static str,
        /// Expected field count.
        expected: usize,
        /// Actual field count.
        actual: usize,
    },

    /// A field is not a number.
    #[error("{resource} field {value:?} is not a number")]
    NotANumber {
        /// Resource the body was read from.
        resource: &'static str,
        /// The offending field text.
        value: String,
    },
}
