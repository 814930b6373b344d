use crate::model::{ClientId, GameEvent, JoinRejectReason, PlayerSlots, Role};
use crate::server::{Connection, RelayError, RoleRegistry};
use async_trait::async_trait;
use axum::extract::ws::Message;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

/// Seam between the socket listener and the relay logic.
#[async_trait]
pub trait RelayHandler {
    async fn handle_event(&self, from: ClientId, event: GameEvent) -> Result<(), RelayError>;
}

/// The broadcast point. Holds the open connections and the role registry;
/// every domain event fans out to all connections open at that moment, the
/// sender included. No replay, no queueing, no persistence.
#[derive(Clone, Default)]
pub struct Relay {
    connections: Arc<RwLock<HashMap<ClientId, Connection>>>,
    registry: Arc<RoleRegistry>,
}

impl Relay {
    pub fn new() -> Self {
        Relay::default()
    }

    pub async fn register(&self, connection: Connection) {
        info!(client_id = %connection.client_id, "client connected");
        let mut connections = self.connections.write().await;
        connections.insert(connection.client_id, connection);
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    pub fn slots(&self) -> Result<PlayerSlots, RelayError> {
        self.registry.snapshot()
    }

    /// Remove a connection; if it held a role, free the slot and announce
    /// the departure. Safe to call more than once per connection.
    #[instrument(skip(self))]
    pub async fn disconnect(&self, client_id: ClientId) -> Result<(), RelayError> {
        let removed = self.connections.write().await.remove(&client_id);
        let Some(connection) = removed else {
            return Ok(());
        };

        if let Some(role) = connection.role {
            if let Some(players) = self.registry.release(role, client_id)? {
                info!(%client_id, %role, "player left");
                self.broadcast(&GameEvent::PlayerLeft { role, players })
                    .await?;
            }
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn join(&self, from: ClientId, role: Role) -> Result<(), RelayError> {
        match self.registry.claim(role, from)? {
            Some(players) => {
                if let Some(connection) = self.connections.write().await.get_mut(&from) {
                    connection.role = Some(role);
                }
                info!(client_id = %from, %role, "player joined");
                self.broadcast(&GameEvent::PlayerJoined { role, players })
                    .await
            }
            None => {
                info!(client_id = %from, %role, "join rejected, role taken");
                self.send_to(
                    from,
                    &GameEvent::JoinRejected {
                        role,
                        reason: JoinRejectReason::RoleTaken,
                    },
                )
                .await
            }
        }
    }

    pub async fn broadcast(&self, event: &GameEvent) -> Result<(), RelayError> {
        let text = serde_json::to_string(event)?;
        let connections: Vec<Connection> =
            self.connections.read().await.values().cloned().collect();

        for connection in connections {
            if connection
                .sender
                .send(Message::Text(text.clone()))
                .await
                .is_err()
            {
                warn!(client_id = %connection.client_id, "failed to deliver broadcast");
            }
        }
        Ok(())
    }

    pub async fn send_to(&self, client_id: ClientId, event: &GameEvent) -> Result<(), RelayError> {
        let text = serde_json::to_string(event)?;
        let connection = self.connections.read().await.get(&client_id).cloned();

        if let Some(connection) = connection {
            if connection.sender.send(Message::Text(text)).await.is_err() {
                warn!(%client_id, "failed to deliver event");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl RelayHandler for Relay {
    #[instrument(skip(self, event), fields(event = event.name()))]
    async fn handle_event(&self, from: ClientId, event: GameEvent) -> Result<(), RelayError> {
        match event {
            GameEvent::Join { role } => self.join(from, role).await,
            // `rocketLaunched` is the legacy client-side name; both forms
            // fan out as `rocketIncoming`.
            GameEvent::RocketLaunched { rocket_id } | GameEvent::RocketIncoming { rocket_id } => {
                self.broadcast(&GameEvent::RocketIncoming { rocket_id })
                    .await
            }
            other @ (GameEvent::PlayerJoined { .. }
            | GameEvent::PlayerLeft { .. }
            | GameEvent::JoinRejected { .. }) => {
                warn!(
                    client_id = %from,
                    event = other.name(),
                    "dropping relay-origin event sent by a client"
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RocketId;
    use tokio::sync::mpsc::{channel, Receiver};

    async fn connect(relay: &Relay) -> (ClientId, Receiver<Message>) {
        let (tx, rx) = channel(8);
        let client_id = ClientId::new_v4();
        relay.register(Connection::new(client_id, tx)).await;
        (client_id, rx)
    }

    fn next_event(rx: &mut Receiver<Message>) -> GameEvent {
        match rx.try_recv().expect("expected a delivered frame") {
            Message::Text(text) => serde_json::from_str(&text).expect("frame parses as GameEvent"),
            other => panic!("unexpected frame: {:?}", other),
        }
    }

    #[tokio::test]
    async fn join_claims_the_slot_and_broadcasts() {
        let relay = Relay::new();
        let (a, mut rx_a) = connect(&relay).await;

        relay
            .handle_event(a, GameEvent::Join { role: Role::Sender })
            .await
            .unwrap();

        assert_eq!(relay.slots().unwrap().sender, Some(a));
        match next_event(&mut rx_a) {
            GameEvent::PlayerJoined { role, players } => {
                assert_eq!(role, Role::Sender);
                assert_eq!(players.sender, Some(a));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn conflicting_join_is_rejected_without_touching_the_slot() {
        let relay = Relay::new();
        let (a, mut rx_a) = connect(&relay).await;
        let (c, mut rx_c) = connect(&relay).await;

        relay
            .handle_event(a, GameEvent::Join { role: Role::Sender })
            .await
            .unwrap();
        next_event(&mut rx_a);
        next_event(&mut rx_c);

        relay
            .handle_event(c, GameEvent::Join { role: Role::Sender })
            .await
            .unwrap();

        assert_eq!(relay.slots().unwrap().sender, Some(a));
        match next_event(&mut rx_c) {
            GameEvent::JoinRejected { role, reason } => {
                assert_eq!(role, Role::Sender);
                assert_eq!(reason, JoinRejectReason::RoleTaken);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        // The rejection goes to the requester only.
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn rocket_events_fan_out_to_everyone_as_rocket_incoming() {
        let relay = Relay::new();
        let (a, mut rx_a) = connect(&relay).await;
        let (_b, mut rx_b) = connect(&relay).await;

        relay
            .handle_event(
                a,
                GameEvent::RocketLaunched {
                    rocket_id: RocketId::Id(3),
                },
            )
            .await
            .unwrap();

        for rx in [&mut rx_a, &mut rx_b] {
            match next_event(rx) {
                GameEvent::RocketIncoming { rocket_id } => assert_eq!(rocket_id, RocketId::Id(3)),
                other => panic!("unexpected event: {:?}", other),
            }
            // Exactly once per connection.
            assert!(rx.try_recv().is_err());
        }
    }

    #[tokio::test]
    async fn disconnect_frees_the_slot_and_announces_the_departure() {
        let relay = Relay::new();
        let (a, mut rx_a) = connect(&relay).await;
        let (b, mut rx_b) = connect(&relay).await;

        relay
            .handle_event(a, GameEvent::Join { role: Role::Sender })
            .await
            .unwrap();
        relay
            .handle_event(b, GameEvent::Join { role: Role::Receiver })
            .await
            .unwrap();
        while rx_a.try_recv().is_ok() {}
        while rx_b.try_recv().is_ok() {}

        relay.disconnect(a).await.unwrap();

        match next_event(&mut rx_b) {
            GameEvent::PlayerLeft { role, players } => {
                assert_eq!(role, Role::Sender);
                assert_eq!(players.sender, None);
                assert_eq!(players.receiver, Some(b));
            }
            other => panic!("unexpected event: {:?}", other),
        }

        // Idempotent: a second disconnect is a silent no-op.
        relay.disconnect(a).await.unwrap();
        assert!(rx_b.try_recv().is_err());
        assert_eq!(relay.connection_count().await, 1);
    }

    #[tokio::test]
    async fn disconnect_without_a_role_broadcasts_nothing() {
        let relay = Relay::new();
        let (a, _rx_a) = connect(&relay).await;
        let (_b, mut rx_b) = connect(&relay).await;

        relay.disconnect(a).await.unwrap();
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn relay_origin_events_from_clients_are_dropped() {
        let relay = Relay::new();
        let (a, mut rx_a) = connect(&relay).await;
        let (_b, mut rx_b) = connect(&relay).await;

        relay
            .handle_event(
                a,
                GameEvent::PlayerJoined {
                    role: Role::Sender,
                    players: PlayerSlots::default(),
                },
            )
            .await
            .unwrap();

        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_err());
        assert_eq!(relay.slots().unwrap(), PlayerSlots::default());
    }
}
