//! Protocol module containing message types and the JSON envelope codec.

pub mod codec;
pub mod messages;

pub use codec::{decode_server, encode_client, ProtocolError};
pub use messages::*;
