use crate::channel::subscription::{dispatch, CallbackMap};
use crate::channel::{ChannelError, EventCallback, GameChannel, Subscription};
use crate::config::Config;
use crate::model::GameEvent;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{SinkExt, StreamExt};
use gloo_net::websocket::futures::WebSocket;
use gloo_net::websocket::Message;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;

/// Browser-side channel speaking the relay's WebSocket protocol. Outbound
/// events are serialized into text frames; inbound frames are parsed
/// against the event vocabulary and dispatched to subscribers, with
/// non-conforming frames dropped.
pub struct WebSocketChannel {
    url: String,
    sender: UnboundedSender<String>,
    receiver: Rc<RefCell<Option<UnboundedReceiver<String>>>>,
    connected: Rc<Cell<bool>>,
    callbacks: CallbackMap,
    next_subscription: Cell<usize>,
}

impl WebSocketChannel {
    pub fn new(url: impl Into<String>) -> Self {
        let (sender, receiver) = mpsc::unbounded();
        WebSocketChannel {
            url: url.into(),
            sender,
            receiver: Rc::new(RefCell::new(Some(receiver))),
            connected: Rc::new(Cell::new(false)),
            callbacks: Rc::new(RefCell::new(HashMap::new())),
            next_subscription: Cell::new(0),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        WebSocketChannel::new(config.websocket_url.clone())
    }

    fn spawn_read_task(&self, mut read: futures::stream::SplitStream<WebSocket>) {
        let callbacks = self.callbacks.clone();
        let connected = self.connected.clone();
        spawn_local(async move {
            while let Some(message) = read.next().await {
                match message {
                    Ok(Message::Text(text)) => match serde_json::from_str::<GameEvent>(&text) {
                        Ok(event) => dispatch(&callbacks, &event),
                        Err(e) => {
                            log::warn!("dropping frame outside the event vocabulary: {:?}", e)
                        }
                    },
                    Ok(Message::Bytes(_)) => {}
                    Err(e) => {
                        log::error!("websocket read failed: {:?}", e);
                        break;
                    }
                }
            }
            connected.set(false);
            log::info!("websocket connection closed");
        });
    }

    fn spawn_write_task(
        &self,
        mut write: futures::stream::SplitSink<WebSocket, Message>,
        mut receiver: UnboundedReceiver<String>,
    ) {
        spawn_local(async move {
            while let Some(text) = receiver.next().await {
                if write.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        });
    }
}

impl GameChannel for WebSocketChannel {
    fn connect(&mut self) -> Result<(), ChannelError> {
        let ws = WebSocket::open(&self.url)
            .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;
        let (write, read) = ws.split();

        let receiver = self
            .receiver
            .borrow_mut()
            .take()
            .ok_or_else(|| ChannelError::ConnectionFailed("channel already used".to_string()))?;

        self.spawn_read_task(read);
        self.spawn_write_task(write, receiver);
        self.connected.set(true);
        Ok(())
    }

    fn disconnect(&mut self) {
        self.connected.set(false);
        self.sender.close_channel();
    }

    fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn send(&self, event: &GameEvent) -> Result<(), ChannelError> {
        if !self.is_connected() {
            return Err(ChannelError::NotConnected);
        }
        let text = serde_json::to_string(event)?;
        self.sender
            .unbounded_send(text)
            .map_err(|e| ChannelError::SendFailed(e.to_string()))
    }

    fn on_event(&self, callback: EventCallback) -> Subscription {
        let id = self.next_subscription.get();
        self.next_subscription.set(id + 1);
        self.callbacks.borrow_mut().insert(id, callback);
        Subscription::new(id, &self.callbacks)
    }
}
