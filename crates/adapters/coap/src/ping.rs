//! CoAP ping: an empty confirmable message, answered by any live endpoint
//! with a reset (or an empty ACK) carrying the same message ID.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use coap_lite::{MessageClass, MessageType, Packet};
use tokio::net::UdpSocket;

use crate::error::CoapError;

const MAX_DATAGRAM: usize = 1152;

/// Serialise an empty confirmable message with the given ID.
///
/// # Errors
///
/// Returns [`CoapError::Encode`] if the packet cannot be serialised.
pub fn empty_confirmable(message_id: u16) -> Result<Vec<u8>, CoapError> {
    let mut packet = Packet::new();
    packet.header.set_type(MessageType::Confirmable);
    packet.header.code = MessageClass::Empty;
    packet.header.message_id = message_id;
    packet
        .to_bytes()
        .map_err(|err| CoapError::Encode(format!("{err:?}")))
}

/// Whether `datagram` is a reply to the ping with `message_id`.
#[must_use]
pub fn is_pong(datagram: &[u8], message_id: u16) -> bool {
    let Ok(packet) = Packet::from_bytes(datagram) else {
        return false;
    };
    packet.header.message_id == message_id
        && matches!(
            packet.header.get_type(),
            MessageType::Reset | MessageType::Acknowledgement
        )
}

/// Send a ping to `target` and wait up to `timeout` for the matching reply.
///
/// Unrelated datagrams are skipped until `timeout` elapses. Any duration
/// is accepted, including [`Duration::MAX`].
///
/// # Errors
///
/// Returns [`CoapError`] if the socket cannot be bound or the ping cannot
/// be sent. An unanswered ping is `Ok(false)`.
pub async fn ping(target: SocketAddr, message_id: u16, timeout: Duration) -> Result<bool, CoapError> {
    let local: SocketAddr = if target.is_ipv6() {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    };
    let socket = UdpSocket::bind(local).await?;
    socket
        .send_to(&empty_confirmable(message_id)?, target)
        .await?;

    let mut buf = [0u8; MAX_DATAGRAM];
    let wait = async {
        loop {
            let (len, from) = socket.recv_from(&mut buf).await?;
            if from != target {
                tracing::trace!(%from, "ignoring datagram from another peer");
            } else if is_pong(&buf[..len], message_id) {
                return Ok::<_, CoapError>(());
            } else {
                tracing::trace!(%from, len, "ignoring unrelated datagram");
            }
        }
    };

    // `timeout` saturates oversized durations instead of overflowing.
    match tokio::time::timeout(timeout, wait).await {
        Ok(Ok(())) => Ok(true),
        Ok(Err(err)) => Err(err),
        Err(_) => Ok(false),
    }
}
