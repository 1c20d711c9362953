//! Protocol traits shared by every wire format.

use crate::error::DecodeError;

use super::game_state::GameStateSnapshot;

/// A fixed-size packet format that can be decoded.
///
/// Each implementation defines:
/// - Its version number and packet size
/// - How to turn bytes into a message (`try_decode`)
///
/// Receivers hold an ordered list of protocols and take the first one that
/// decodes a packet.
pub trait ReceivingProtocol: Send + Sync {
    /// Decoded message type.
    type Message;

    /// Protocol version carried in the packet.
    fn version(&self) -> u8;

    /// Packet size in bytes.
    fn size(&self) -> usize;

    /// Decode a packet, explaining why it was rejected.
    fn try_decode(&self, bytes: &[u8]) -> Result<Self::Message, DecodeError>;

    /// Decode a packet, discarding the reason for a rejection.
    fn decode(&self, bytes: &[u8]) -> Option<Self::Message> {
        match self.try_decode(bytes) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::trace!(version = self.version(), error = %e, "packet rejected");
                None
            }
        }
    }
}

/// A game-state packet format.
///
/// Encoding always succeeds; decoding yields the wire view of the state.
pub trait GameStateProtocol: ReceivingProtocol<Message = GameStateSnapshot> {
    /// Encode a snapshot into exactly `size()` bytes.
    fn encode(&self, snapshot: &GameStateSnapshot) -> Vec<u8>;
}
