use crate::channel::{GameChannel, Subscription};
use crate::handler::HandlerError;
use crate::model::{
    Answer, ChallengeSession, ChallengeTiming, GameEvent, JoinRejectReason, PlayerSlots, RocketId,
    Role, RocketCatalog, SubmissionOutcome,
};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// The Mars side of the game. Joins the `sender` slot, hands out challenge
/// sessions for unlaunched rockets, and turns each first success into one
/// `rocketIncoming` broadcast.
pub struct SenderHandler<C: GameChannel> {
    channel: C,
    catalog: RocketCatalog,
    timing: ChallengeTiming,
    launched: Rc<RefCell<HashSet<u32>>>,
    slots: Rc<RefCell<PlayerSlots>>,
    rejection: Rc<RefCell<Option<JoinRejectReason>>>,
    // Held so the slot subscription lives as long as the handler.
    _subscription: Option<Subscription>,
}

impl<C: GameChannel> SenderHandler<C> {
    pub fn new(channel: C, catalog: RocketCatalog) -> Self {
        SenderHandler {
            channel,
            catalog,
            timing: ChallengeTiming::default(),
            launched: Rc::new(RefCell::new(HashSet::new())),
            slots: Rc::new(RefCell::new(PlayerSlots::default())),
            rejection: Rc::new(RefCell::new(None)),
            _subscription: None,
        }
    }

    pub fn with_timing(mut self, timing: ChallengeTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Connect, subscribe to slot updates, and request the `sender` role.
    pub fn connect(&mut self) -> Result<(), HandlerError> {
        self.channel.connect()?;

        let slots = self.slots.clone();
        let rejection = self.rejection.clone();
        let subscription = self.channel.on_event(Rc::new(move |event| match event {
            GameEvent::PlayerJoined { players, .. } | GameEvent::PlayerLeft { players, .. } => {
                *slots.borrow_mut() = *players;
            }
            GameEvent::JoinRejected {
                role: Role::Sender,
                reason,
            } => {
                log::warn!("sender join rejected: {:?}", reason);
                *rejection.borrow_mut() = Some(*reason);
            }
            _ => {}
        }));
        self._subscription = Some(subscription);

        self.channel.send(&GameEvent::Join { role: Role::Sender })?;
        Ok(())
    }

    /// Announce a fresh mission: clears the receiver's revealed segments
    /// via the reset marker and forgets local launch bookkeeping.
    pub fn start_mission(&self) -> Result<(), HandlerError> {
        self.launched.borrow_mut().clear();
        self.channel.send(&GameEvent::RocketIncoming {
            rocket_id: RocketId::reset(),
        })?;
        Ok(())
    }

    /// Latest role-slot snapshot broadcast by the relay.
    pub fn peers(&self) -> PlayerSlots {
        *self.slots.borrow()
    }

    pub fn rejection(&self) -> Option<JoinRejectReason> {
        *self.rejection.borrow()
    }

    pub fn is_launched(&self, rocket_id: u32) -> bool {
        self.launched.borrow().contains(&rocket_id)
    }

    pub fn catalog(&self) -> &RocketCatalog {
        &self.catalog
    }

    /// Open a challenge session for a rocket that has not launched yet.
    pub fn select_rocket(&self, rocket_id: u32) -> Option<ChallengeSession> {
        if self.is_launched(rocket_id) {
            return None;
        }
        self.catalog
            .get_rocket(rocket_id)
            .map(|rocket| ChallengeSession::for_rocket(rocket).with_timing(self.timing))
    }

    /// Drive one submission cycle; on the session's single launch, broadcast
    /// `rocketIncoming` and mark the rocket as gone.
    pub async fn submit(
        &self,
        session: &mut ChallengeSession,
        answer: &Answer,
    ) -> Result<SubmissionOutcome, HandlerError> {
        let outcome = session.run(answer).await?;
        if let Some(launch) = outcome.launch {
            self.channel.send(&GameEvent::RocketIncoming {
                rocket_id: RocketId::Id(launch.rocket_id),
            })?;
            self.launched.borrow_mut().insert(launch.rocket_id);
        }
        Ok(outcome)
    }
}
