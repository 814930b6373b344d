mod challenge;
mod event;
mod receiver;
mod rocket;
mod role;
mod slots;

pub use challenge::{
    ChallengeError, ChallengeSession, ChallengeState, ChallengeTiming, Launch, SubmissionOutcome,
};
pub use event::{GameEvent, JoinRejectReason, RocketId, RESET_MARKER};
pub use receiver::{LandingAction, LandingState, ReceiverProgress, Segment, SegmentKind};
pub use rocket::{Answer, Bucket, ChallengeKind, FileCard, GraphNode, Rocket, RocketCatalog, Step};
pub use role::Role;
pub use slots::{ClientId, PlayerSlots};
