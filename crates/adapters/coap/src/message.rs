//! CoAP message helpers.
//!
//! Pure functions building requests for a [`Resource`] and classifying
//! responses. No sockets involved.

use std::net::SocketAddr;

use coap_lite::{
    CoapOption, CoapRequest, CoapResponse, ContentFormat, MessageClass, Packet,
    RequestType as Method, ResponseType,
};

use openmote_app::ports::Notification;
use openmote_domain::endpoint::Resource;

use crate::error::CoapError;

/// Build a request for `resource` with the given method and optional
/// `text/plain` body.
#[must_use]
pub fn build_request(
    resource: &Resource,
    method: Method,
    body: Option<&str>,
) -> CoapRequest<SocketAddr> {
    let mut request: CoapRequest<SocketAddr> = CoapRequest::new();
    request.set_method(method);
    request.set_path(resource.path());

    if let Some(query) = resource.query() {
        request
            .message
            .add_option(CoapOption::UriQuery, query.as_bytes().to_vec());
    }

    if let Some(body) = body {
        request.message.set_content_format(ContentFormat::TextPlain);
        request.message.payload = body.as_bytes().to_vec();
    }

    request
}

/// Whether a response code is in the 2.xx class.
#[must_use]
pub fn is_success(status: &ResponseType) -> bool {
    matches!(
        status,
        ResponseType::Created
            | ResponseType::Deleted
            | ResponseType::Valid
            | ResponseType::Changed
            | ResponseType::Content
            | ResponseType::Continue
    )
}

/// Extract the body of a response, rejecting error codes.
///
/// # Errors
///
/// Returns [`CoapError::Status`] for any non-2.xx response.
pub fn response_body(response: CoapResponse) -> Result<Vec<u8>, CoapError> {
    let status = response.get_status();
    if is_success(status) {
        Ok(response.message.payload)
    } else {
        Err(CoapError::Status(format!("{status:?}")))
    }
}

/// Turn one observe notification packet into a [`Notification`].
#[must_use]
pub fn notification(packet: Packet) -> Notification {
    match packet.header.code {
        MessageClass::Response(status) if !is_success(&status) => {
            Err(CoapError::Status(format!("{status:?}")).into_transport())
        }
        _ => Ok(packet.payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openmote_domain::endpoint::{Endpoint, LEDS_PATH, SHT21_PATH};

    fn endpoint() -> Endpoint {
        Endpoint::parse("fd00::212:4b00:430:53c0", 5683).unwrap()
    }

    fn response_packet(status: ResponseType, payload: &[u8]) -> Packet {
        let mut packet = Packet::new();
        packet.header.code = MessageClass::Response(status);
        packet.payload = payload.to_vec();
        packet
    }

    #[test]
    fn should_build_get_without_body() {
        let resource = Resource::new(endpoint(), SHT21_PATH);
        let request = build_request(&resource, Method::Get, None);
        assert_eq!(*request.get_method(), Method::Get);
        assert_eq!(request.get_path(), "sensors/sht21");
        assert!(request.message.payload.is_empty());
    }

    #[test]
    fn should_build_post_with_query_and_text_body() {
        let resource = Resource::with_query(endpoint(), LEDS_PATH, "color=g");
        let request = build_request(&resource, Method::Post, Some("mode=toggle"));

        assert_eq!(*request.get_method(), Method::Post);
        assert_eq!(request.get_path(), "actuators/leds");
        assert_eq!(request.message.payload, b"mode=toggle".to_vec());

        let query = request
            .message
            .get_option(CoapOption::UriQuery)
            .and_then(|values| values.iter().next().cloned());
        assert_eq!(query, Some(b"color=g".to_vec()));
    }

    #[test]
    fn should_treat_two_xx_codes_as_success() {
        assert!(is_success(&ResponseType::Content));
        assert!(is_success(&ResponseType::Changed));
        assert!(!is_success(&ResponseType::NotFound));
        assert!(!is_success(&ResponseType::InternalServerError));
    }

    #[test]
    fn should_pass_content_notification_body_through() {
        let packet = response_packet(ResponseType::Content, b"1");
        assert_eq!(notification(packet).unwrap(), b"1".to_vec());
    }

    #[test]
    fn should_turn_error_notification_into_status_error() {
        let packet = response_packet(ResponseType::ServiceUnavailable, b"");
        let err = notification(packet).unwrap_err();
        assert!(err.to_string().contains("ServiceUnavailable"));
    }
}
