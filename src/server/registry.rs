use crate::model::{ClientId, PlayerSlots, Role};
use crate::server::RelayError;
use std::sync::RwLock;
use tracing::{debug, instrument};

/// The explicitly owned role-slot map. All mutation happens through
/// [`RoleRegistry::claim`] and [`RoleRegistry::release`], each a single
/// check-then-set under one write guard, so two simultaneous claims for the
/// same role resolve to exactly one winner.
#[derive(Debug, Default)]
pub struct RoleRegistry {
    slots: RwLock<PlayerSlots>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        RoleRegistry::default()
    }

    /// Claim a role for a connection. Returns the updated snapshot on
    /// success, `None` when the slot is already occupied.
    #[instrument(skip(self))]
    pub fn claim(
        &self,
        role: Role,
        client_id: ClientId,
    ) -> Result<Option<PlayerSlots>, RelayError> {
        let mut slots = self.slots.write().map_err(|_| RelayError::LockPoisoned)?;
        if !slots.is_free(role) {
            debug!(%role, "slot already occupied");
            return Ok(None);
        }
        slots.set(role, client_id);
        Ok(Some(*slots))
    }

    /// Clear a role if (and only if) this connection holds it. Returns the
    /// updated snapshot when the slot was cleared; idempotent otherwise.
    #[instrument(skip(self))]
    pub fn release(
        &self,
        role: Role,
        client_id: ClientId,
    ) -> Result<Option<PlayerSlots>, RelayError> {
        let mut slots = self.slots.write().map_err(|_| RelayError::LockPoisoned)?;
        if slots.get(role) != Some(client_id) {
            return Ok(None);
        }
        slots.clear(role);
        Ok(Some(*slots))
    }

    pub fn snapshot(&self) -> Result<PlayerSlots, RelayError> {
        let slots = self.slots.read().map_err(|_| RelayError::LockPoisoned)?;
        Ok(*slots)
    }
}
