use crate::channel::subscription::{dispatch, CallbackMap};
use crate::channel::{ChannelError, EventCallback, GameChannel, Subscription};
use crate::model::GameEvent;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// In-process broadcast medium: the hosted pub/sub channel without the
/// network. Also the transport the handler tests run on.
#[derive(Clone, Default)]
pub struct LocalHub {
    inner: Rc<RefCell<HubInner>>,
}

#[derive(Default)]
struct HubInner {
    next_peer: usize,
    peers: HashMap<usize, Peer>,
}

struct Peer {
    connected: bool,
    callbacks: CallbackMap,
}

impl LocalHub {
    pub fn new() -> Self {
        LocalHub::default()
    }

    /// Hand out a fresh, not-yet-connected channel on this hub.
    pub fn channel(&self) -> LocalChannel {
        let mut inner = self.inner.borrow_mut();
        let peer_id = inner.next_peer;
        inner.next_peer += 1;
        inner.peers.insert(
            peer_id,
            Peer {
                connected: false,
                callbacks: Rc::new(RefCell::new(HashMap::new())),
            },
        );
        LocalChannel {
            hub: self.clone(),
            peer_id,
            next_subscription: Cell::new(0),
        }
    }

    fn broadcast(&self, event: &GameEvent) {
        // Snapshot the connected peers before dispatching so callbacks can
        // touch the hub again.
        let targets: Vec<CallbackMap> = self
            .inner
            .borrow()
            .peers
            .values()
            .filter(|peer| peer.connected)
            .map(|peer| peer.callbacks.clone())
            .collect();

        log::debug!(
            "local hub broadcasting {} to {} peer(s)",
            event.name(),
            targets.len()
        );
        for callbacks in targets {
            dispatch(&callbacks, event);
        }
    }

    fn set_connected(&self, peer_id: usize, connected: bool) {
        if let Some(peer) = self.inner.borrow_mut().peers.get_mut(&peer_id) {
            peer.connected = connected;
        }
    }

    fn is_connected(&self, peer_id: usize) -> bool {
        self.inner
            .borrow()
            .peers
            .get(&peer_id)
            .map(|peer| peer.connected)
            .unwrap_or(false)
    }

    fn callbacks(&self, peer_id: usize) -> Option<CallbackMap> {
        self.inner
            .borrow()
            .peers
            .get(&peer_id)
            .map(|peer| peer.callbacks.clone())
    }
}

pub struct LocalChannel {
    hub: LocalHub,
    peer_id: usize,
    next_subscription: Cell<usize>,
}

impl GameChannel for LocalChannel {
    fn connect(&mut self) -> Result<(), ChannelError> {
        self.hub.set_connected(self.peer_id, true);
        Ok(())
    }

    fn disconnect(&mut self) {
        self.hub.set_connected(self.peer_id, false);
    }

    fn is_connected(&self) -> bool {
        self.hub.is_connected(self.peer_id)
    }

    fn send(&self, event: &GameEvent) -> Result<(), ChannelError> {
        if !self.is_connected() {
            return Err(ChannelError::NotConnected);
        }
        self.hub.broadcast(event);
        Ok(())
    }

    fn on_event(&self, callback: EventCallback) -> Subscription {
        let callbacks = self
            .hub
            .callbacks(self.peer_id)
            .expect("peer registered at channel creation");
        let id = self.next_subscription.get();
        self.next_subscription.set(id + 1);
        callbacks.borrow_mut().insert(id, callback);
        Subscription::new(id, &callbacks)
    }
}
