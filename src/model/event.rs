use crate::model::{PlayerSlots, Role};
use serde::{Deserialize, Serialize};

/// Rocket id carried by the `"reset"` marker payload.
pub const RESET_MARKER: &str = "reset";

/// Rocket identifier on the wire: a number for real rockets, a string for
/// markers such as `"reset"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RocketId {
    Id(u32),
    Marker(String),
}

impl RocketId {
    pub fn reset() -> Self {
        RocketId::Marker(RESET_MARKER.to_string())
    }

    pub fn is_reset(&self) -> bool {
        matches!(self, RocketId::Marker(marker) if marker == RESET_MARKER)
    }

    pub fn id(&self) -> Option<u32> {
        match self {
            RocketId::Id(id) => Some(*id),
            RocketId::Marker(_) => None,
        }
    }
}

impl From<u32> for RocketId {
    fn from(id: u32) -> Self {
        RocketId::Id(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinRejectReason {
    RoleTaken,
}

/// The complete event vocabulary, discriminated by wire name and validated
/// at the channel boundary. Frames that do not parse into this union are
/// dropped by the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum GameEvent {
    #[serde(rename = "join")]
    Join { role: Role },
    #[serde(rename = "playerJoined")]
    PlayerJoined { role: Role, players: PlayerSlots },
    #[serde(rename = "playerLeft")]
    PlayerLeft { role: Role, players: PlayerSlots },
    #[serde(rename = "joinRejected")]
    JoinRejected { role: Role, reason: JoinRejectReason },
    #[serde(rename = "rocketLaunched", rename_all = "camelCase")]
    RocketLaunched { rocket_id: RocketId },
    #[serde(rename = "rocketIncoming", rename_all = "camelCase")]
    RocketIncoming { rocket_id: RocketId },
}

impl GameEvent {
    /// Wire name of the event, as listed in the vocabulary table.
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::Join { .. } => "join",
            GameEvent::PlayerJoined { .. } => "playerJoined",
            GameEvent::PlayerLeft { .. } => "playerLeft",
            GameEvent::JoinRejected { .. } => "joinRejected",
            GameEvent::RocketLaunched { .. } => "rocketLaunched",
            GameEvent::RocketIncoming { .. } => "rocketIncoming",
        }
    }
}
