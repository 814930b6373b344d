pub mod channel;
pub mod config;
pub mod handler;
pub mod model;

#[cfg(feature = "server")]
pub mod server;

pub mod prelude {
    pub use crate::channel::ChannelError;
    pub use crate::channel::GameChannel;
    pub use crate::channel::LocalChannel;
    pub use crate::channel::LocalHub;
    pub use crate::channel::Subscription;
    pub use crate::handler::ReceiverHandler;
    pub use crate::handler::SenderHandler;
    pub use crate::model::Answer;
    pub use crate::model::ChallengeKind;
    pub use crate::model::ChallengeSession;
    pub use crate::model::ChallengeState;
    pub use crate::model::ChallengeTiming;
    pub use crate::model::GameEvent;
    pub use crate::model::PlayerSlots;
    pub use crate::model::ReceiverProgress;
    pub use crate::model::Rocket;
    pub use crate::model::RocketCatalog;
    pub use crate::model::RocketId;
    pub use crate::model::Role;
}
