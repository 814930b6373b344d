use crate::model::{ClientId, Role};
use axum::extract::ws::Message;
use tokio::sync::mpsc::Sender;

#[derive(Debug, Clone)]
pub struct Connection {
    pub client_id: ClientId,
    pub role: Option<Role>,
    pub sender: Sender<Message>,
}

impl Connection {
    pub fn new(client_id: ClientId, sender: Sender<Message>) -> Self {
        Connection {
            client_id,
            role: None,
            sender,
        }
    }
}
