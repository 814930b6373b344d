use crate::model::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ClientId = Uuid;

/// Snapshot of which connection currently holds each role. A slot is either
/// empty or references exactly one open connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlots {
    pub sender: Option<ClientId>,
    pub receiver: Option<ClientId>,
}

impl PlayerSlots {
    pub fn get(&self, role: Role) -> Option<ClientId> {
        match role {
            Role::Sender => self.sender,
            Role::Receiver => self.receiver,
        }
    }

    pub fn set(&mut self, role: Role, client_id: ClientId) {
        match role {
            Role::Sender => self.sender = Some(client_id),
            Role::Receiver => self.receiver = Some(client_id),
        }
    }

    pub fn clear(&mut self, role: Role) {
        match role {
            Role::Sender => self.sender = None,
            Role::Receiver => self.receiver = None,
        }
    }

    pub fn is_free(&self, role: Role) -> bool {
        self.get(role).is_none()
    }
}
