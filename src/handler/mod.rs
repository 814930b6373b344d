mod receiver;
mod sender;

use crate::channel::ChannelError;
use crate::model::ChallengeError;
use thiserror::Error;

pub use receiver::{LandingReport, ReceiverHandler};
pub use sender::SenderHandler;

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error(transparent)]
    Challenge(#[from] ChallengeError),
}
