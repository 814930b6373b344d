use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("channel is not connected")]
    NotConnected,
    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("send failed: {0}")]
    SendFailed(String),
}
