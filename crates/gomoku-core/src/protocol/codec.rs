//! JSON envelope codec for the Gomoku wire protocol.
//!
//! Wire format (one WebSocket text frame per message):
//! ```text
//! {"type": <u16 code>, "payload": { ...message fields... }}
//! ```
//!
//! Encoding is infallible in practice but still returns `Result`, mirroring
//! the asymmetry of the wire: the client controls what it sends, while
//! anything at all can arrive.  Decode errors distinguish an unreadable
//! envelope from an unknown type code, because the two are handled
//! differently upstream: an unknown code is dropped silently by design,
//! a malformed frame is logged as a protocol violation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::protocol::messages::{ClientMessage, MessageType, ServerMessage};

/// Errors that can occur during envelope encoding or decoding.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame is not a `{"type": …, "payload": …}` JSON object.
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),

    /// The numeric type code is not in the message catalogue.
    #[error("unknown message type code: {0}")]
    UnknownType(u16),

    /// A known code arrived in the wrong direction (a client-only request
    /// showing up inbound).
    #[error("message type {0:?} is not a server-to-client message")]
    UnexpectedDirection(MessageType),

    /// The payload object does not match the shape the code implies.
    #[error("malformed {kind} payload: {source}")]
    MalformedPayload {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A payload could not be serialized on the way out.
    #[error("failed to serialize payload: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// The untyped JSON envelope as it exists on the wire.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    msg_type: u16,
    #[serde(default)]
    payload: Value,
}

// ── Encoding ──────────────────────────────────────────────────────────────────

/// Encodes a [`ClientMessage`] into one JSON text frame.
///
/// Empty-payload messages (`Ping`, `RoomList`) are sent with `payload: {}`,
/// matching what the server expects.
///
/// # Errors
///
/// Returns [`ProtocolError::Serialize`] if a payload fails to serialize.
pub fn encode_client(msg: &ClientMessage) -> Result<String, ProtocolError> {
    let payload = match msg {
        ClientMessage::Ping | ClientMessage::RoomList => Value::Object(Default::default()),
        ClientMessage::Login(m) => to_payload(m)?,
        ClientMessage::Register(m) => to_payload(m)?,
        ClientMessage::CreateRoom(m) => to_payload(m)?,
        ClientMessage::JoinRoom(m) => to_payload(m)?,
        ClientMessage::LeaveRoom(m) => to_payload(m)?,
        ClientMessage::Move(m) => to_payload(m)?,
        ClientMessage::Forfeit(m) => to_payload(m)?,
        ClientMessage::Leaderboard(m) => to_payload(m)?,
        ClientMessage::UserStats(m) => to_payload(m)?,
    };

    let envelope = Envelope {
        msg_type: msg.message_type() as u16,
        payload,
    };
    serde_json::to_string(&envelope).map_err(ProtocolError::Serialize)
}

fn to_payload<T: Serialize>(payload: &T) -> Result<Value, ProtocolError> {
    serde_json::to_value(payload).map_err(ProtocolError::Serialize)
}

// ── Decoding ──────────────────────────────────────────────────────────────────

/// Decodes one inbound text frame into a typed [`ServerMessage`].
///
/// Unknown payload fields are ignored, so the client keeps working against
/// servers that send richer payloads than the catalogue models.
///
/// # Errors
///
/// - [`ProtocolError::InvalidEnvelope`] if the frame is not the envelope shape.
/// - [`ProtocolError::UnknownType`] for a code outside the catalogue.
/// - [`ProtocolError::UnexpectedDirection`] for a client-only code.
/// - [`ProtocolError::MalformedPayload`] if the payload does not parse.
pub fn decode_server(text: &str) -> Result<ServerMessage, ProtocolError> {
    let envelope: Envelope =
        serde_json::from_str(text).map_err(|e| ProtocolError::InvalidEnvelope(e.to_string()))?;

    let msg_type = MessageType::try_from(envelope.msg_type)
        .map_err(|_| ProtocolError::UnknownType(envelope.msg_type))?;

    let payload = envelope.payload;
    match msg_type {
        MessageType::Pong => Ok(ServerMessage::Pong),
        MessageType::LoginResp => from_payload(payload, "LoginResp").map(ServerMessage::LoginResp),
        MessageType::RegisterResp => {
            from_payload(payload, "RegisterResp").map(ServerMessage::RegisterResp)
        }
        MessageType::CreateRoomResp => {
            from_payload(payload, "CreateRoomResp").map(ServerMessage::CreateRoomResp)
        }
        MessageType::JoinRoomResp => {
            from_payload(payload, "JoinRoomResp").map(ServerMessage::JoinRoomResp)
        }
        MessageType::LeaveRoomResp => {
            from_payload(payload, "LeaveRoomResp").map(ServerMessage::LeaveRoomResp)
        }
        MessageType::RoomListResp => {
            from_payload(payload, "RoomListResp").map(ServerMessage::RoomListResp)
        }
        MessageType::PlayerJoined => {
            from_payload(payload, "PlayerJoined").map(ServerMessage::PlayerJoined)
        }
        MessageType::PlayerLeft => {
            from_payload(payload, "PlayerLeft").map(ServerMessage::PlayerLeft)
        }
        MessageType::MoveResp => from_payload(payload, "MoveResp").map(ServerMessage::MoveResp),
        MessageType::GameOver => from_payload(payload, "GameOver").map(ServerMessage::GameOver),
        MessageType::GameStart => from_payload(payload, "GameStart").map(ServerMessage::GameStart),
        MessageType::BoardUpdate => {
            from_payload(payload, "BoardUpdate").map(ServerMessage::BoardUpdate)
        }
        MessageType::ForfeitResp => {
            from_payload(payload, "ForfeitResp").map(ServerMessage::ForfeitResp)
        }
        MessageType::LeaderboardResp => {
            from_payload(payload, "LeaderboardResp").map(ServerMessage::LeaderboardResp)
        }
        MessageType::UserStatsResp => {
            from_payload(payload, "UserStatsResp").map(ServerMessage::UserStatsResp)
        }
        MessageType::Error => from_payload(payload, "Error").map(ServerMessage::Error),

        // Requests never travel server → client.
        MessageType::Ping
        | MessageType::Login
        | MessageType::Register
        | MessageType::CreateRoom
        | MessageType::JoinRoom
        | MessageType::LeaveRoom
        | MessageType::RoomList
        | MessageType::Move
        | MessageType::Forfeit
        | MessageType::Leaderboard
        | MessageType::UserStats => Err(ProtocolError::UnexpectedDirection(msg_type)),
    }
}

fn from_payload<T: for<'de> Deserialize<'de>>(
    payload: Value,
    kind: &'static str,
) -> Result<T, ProtocolError> {
    serde_json::from_value(payload).map_err(|source| ProtocolError::MalformedPayload { kind, source })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::messages::{LeaderboardRequest, LoginRequest, MoveRequest};

    #[test]
    fn test_encode_ping_produces_empty_payload_object() {
        // Act
        let frame = encode_client(&ClientMessage::Ping).unwrap();

        // Assert – the server requires payload to be an object, not null
        assert_eq!(frame, r#"{"type":1000,"payload":{}}"#);
    }

    #[test]
    fn test_encode_move_carries_coordinates() {
        let frame = encode_client(&ClientMessage::Move(MoveRequest {
            room_id: 42,
            x: 7,
            y: 8,
        }))
        .unwrap();

        assert!(frame.contains(r#""type":4001"#));
        assert!(frame.contains(r#""room_id":42"#));
        assert!(frame.contains(r#""x":7"#));
        assert!(frame.contains(r#""y":8"#));
    }

    #[test]
    fn test_encode_token_login_matches_wire_shape() {
        let frame = encode_client(&ClientMessage::Login(LoginRequest::with_token("T1"))).unwrap();
        assert_eq!(frame, r#"{"type":2001,"payload":{"token":"T1"}}"#);
    }

    #[test]
    fn test_decode_login_response() {
        // Arrange: the exact success shape the server sends
        let frame = r#"{"type":2002,"payload":{"code":200,"user_id":"alice","token":"T1"}}"#;

        // Act
        let msg = decode_server(frame).unwrap();

        // Assert
        match msg {
            ServerMessage::LoginResp(resp) => {
                assert_eq!(resp.code, 200);
                assert_eq!(resp.user_id.as_deref(), Some("alice"));
                assert_eq!(resp.token.as_deref(), Some("T1"));
            }
            other => panic!("expected LoginResp, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_pong_with_empty_payload() {
        let msg = decode_server(r#"{"type":1001,"payload":{}}"#).unwrap();
        assert_eq!(msg, ServerMessage::Pong);
    }

    #[test]
    fn test_decode_pong_with_missing_payload_field() {
        // Some servers omit the payload key entirely for empty messages.
        let msg = decode_server(r#"{"type":1001}"#).unwrap();
        assert_eq!(msg, ServerMessage::Pong);
    }

    #[test]
    fn test_decode_unknown_type_code() {
        let err = decode_server(r#"{"type":4242,"payload":{}}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownType(4242)));
    }

    #[test]
    fn test_decode_client_only_code_is_wrong_direction() {
        // A Move request (4001) must never arrive inbound.
        let err = decode_server(r#"{"type":4001,"payload":{"room_id":1,"x":0,"y":0}}"#).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::UnexpectedDirection(MessageType::Move)
        ));
    }

    #[test]
    fn test_decode_garbage_is_invalid_envelope() {
        let err = decode_server("not json at all").unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidEnvelope(_)));
    }

    #[test]
    fn test_decode_malformed_payload_names_the_message_kind() {
        // GameStart requires players; an empty object must fail to parse.
        let err = decode_server(r#"{"type":4004,"payload":{}}"#).unwrap_err();
        match err {
            ProtocolError::MalformedPayload { kind, .. } => assert_eq!(kind, "GameStart"),
            other => panic!("expected MalformedPayload, got {other:?}"),
        }
    }

    #[test]
    fn test_encode_leaderboard_request_limit() {
        let frame =
            encode_client(&ClientMessage::Leaderboard(LeaderboardRequest { limit: 10 })).unwrap();
        assert_eq!(frame, r#"{"type":5001,"payload":{"limit":10}}"#);
    }
}
