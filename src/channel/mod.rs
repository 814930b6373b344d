mod error;
mod local;
mod subscription;

#[cfg(all(feature = "client", target_arch = "wasm32"))]
mod websocket;

use crate::model::GameEvent;
use std::rc::Rc;

pub use error::ChannelError;
pub use local::{LocalChannel, LocalHub};
pub use subscription::Subscription;

#[cfg(all(feature = "client", target_arch = "wasm32"))]
pub use websocket::WebSocketChannel;

pub type EventCallback = Rc<dyn Fn(&GameEvent)>;

/// The abstract broadcast medium both transports implement: the in-process
/// hub ([`LocalChannel`]) and the relay-backed WebSocket client
/// (`WebSocketChannel`). Every event sent reaches every connected party,
/// the sender included; parties connecting later miss earlier events.
pub trait GameChannel {
    fn connect(&mut self) -> Result<(), ChannelError>;

    fn disconnect(&mut self);

    fn is_connected(&self) -> bool;

    fn send(&self, event: &GameEvent) -> Result<(), ChannelError>;

    /// Register a callback for every inbound event. The subscription is
    /// cancelled when the returned handle is dropped.
    fn on_event(&self, callback: EventCallback) -> Subscription;
}
