use crate::channel::{GameChannel, Subscription};
use crate::handler::HandlerError;
use crate::model::{
    GameEvent, LandingAction, PlayerSlots, ReceiverProgress, RocketId, Role, Segment,
};
use futures_timer::Delay;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Matches the original game's two-second descent animation.
pub const DEFAULT_LANDING_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingReport {
    pub rocket_id: RocketId,
    pub revealed: Option<Segment>,
}

/// The Earth side of the game. Joins the `receiver` slot and feeds
/// `rocketIncoming` events through the landing state machine: duplicates
/// arriving during a landing are dropped at observation time, the reset
/// marker clears progress, and each completed landing reveals the next
/// segment.
pub struct ReceiverHandler<C: GameChannel> {
    channel: C,
    progress: Rc<RefCell<ReceiverProgress>>,
    pending: Rc<RefCell<Option<RocketId>>>,
    slots: Rc<RefCell<PlayerSlots>>,
    landing_delay: Duration,
    // Held so the event subscription lives as long as the handler.
    _subscription: Option<Subscription>,
}

impl<C: GameChannel> ReceiverHandler<C> {
    pub fn new(channel: C, progress: ReceiverProgress) -> Self {
        ReceiverHandler {
            channel,
            progress: Rc::new(RefCell::new(progress)),
            pending: Rc::new(RefCell::new(None)),
            slots: Rc::new(RefCell::new(PlayerSlots::default())),
            landing_delay: DEFAULT_LANDING_DELAY,
            _subscription: None,
        }
    }

    pub fn with_landing_delay(mut self, landing_delay: Duration) -> Self {
        self.landing_delay = landing_delay;
        self
    }

    /// Connect, subscribe, and request the `receiver` role. Incoming rocket
    /// ids are observed immediately (so duplicate suppression happens at
    /// arrival), then parked until [`ReceiverHandler::process_landing`]
    /// finishes the descent.
    pub fn connect(&mut self) -> Result<(), HandlerError> {
        self.channel.connect()?;

        let progress = self.progress.clone();
        let pending = self.pending.clone();
        let slots = self.slots.clone();
        let subscription = self.channel.on_event(Rc::new(move |event| match event {
            GameEvent::RocketIncoming { rocket_id } => {
                match progress.borrow_mut().observe(rocket_id) {
                    LandingAction::Started => {
                        *pending.borrow_mut() = Some(rocket_id.clone());
                    }
                    LandingAction::Ignored => {
                        log::debug!("ignoring rocket {:?} while a landing is in flight", rocket_id)
                    }
                    LandingAction::Cleared => {
                        *pending.borrow_mut() = None;
                    }
                }
            }
            GameEvent::PlayerJoined { players, .. } | GameEvent::PlayerLeft { players, .. } => {
                *slots.borrow_mut() = *players;
            }
            _ => {}
        }));
        self._subscription = Some(subscription);

        self.channel
            .send(&GameEvent::Join {
                role: Role::Receiver,
            })?;
        Ok(())
    }

    pub fn peers(&self) -> PlayerSlots {
        *self.slots.borrow()
    }

    pub fn has_pending_landing(&self) -> bool {
        self.pending.borrow().is_some()
    }

    pub fn revealed_segments(&self) -> Vec<Segment> {
        self.progress.borrow().revealed().to_vec()
    }

    pub fn is_complete(&self) -> bool {
        self.progress.borrow().is_complete()
    }

    /// Finish the landing in flight, if any: wait out the descent, then
    /// reveal the next segment.
    pub async fn process_landing(&self) -> Option<LandingReport> {
        let rocket_id = self.pending.borrow_mut().take()?;
        Delay::new(self.landing_delay).await;
        let revealed = self.progress.borrow_mut().complete_landing().cloned();
        Some(LandingReport {
            rocket_id,
            revealed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{LocalChannel, LocalHub};
    use crate::model::SegmentKind;
    use std::cell::Cell;

    fn handler_on(hub: &LocalHub) -> ReceiverHandler<LocalChannel> {
        ReceiverHandler::new(hub.channel(), ReceiverProgress::default_transmission())
            .with_landing_delay(Duration::from_millis(1))
    }

    fn rocket(id: u32) -> GameEvent {
        GameEvent::RocketIncoming {
            rocket_id: RocketId::Id(id),
        }
    }

    #[test]
    fn connect_requests_the_receiver_role() {
        let hub = LocalHub::new();
        let mut probe = hub.channel();
        probe.connect().unwrap();

        let joined = Rc::new(Cell::new(false));
        let seen = joined.clone();
        let _sub = probe.on_event(Rc::new(move |event| {
            if matches!(
                event,
                GameEvent::Join {
                    role: Role::Receiver
                }
            ) {
                seen.set(true);
            }
        }));

        let mut handler = handler_on(&hub);
        handler.connect().unwrap();
        assert!(joined.get());
    }

    #[tokio::test]
    async fn landing_reveals_the_next_segment() {
        let hub = LocalHub::new();
        let mut handler = handler_on(&hub);
        handler.connect().unwrap();

        let mut sender_side = hub.channel();
        sender_side.connect().unwrap();
        sender_side.send(&rocket(1)).unwrap();
        assert!(handler.has_pending_landing());

        let report = handler.process_landing().await.unwrap();
        assert_eq!(report.rocket_id, RocketId::Id(1));
        let segment = report.revealed.unwrap();
        assert_eq!(segment.kind, SegmentKind::Title);
        assert_eq!(handler.revealed_segments().len(), 1);
    }

    #[tokio::test]
    async fn duplicates_during_a_landing_are_dropped() {
        let hub = LocalHub::new();
        let mut handler = handler_on(&hub);
        handler.connect().unwrap();

        let mut sender_side = hub.channel();
        sender_side.connect().unwrap();
        sender_side.send(&rocket(1)).unwrap();
        sender_side.send(&rocket(1)).unwrap();
        sender_side.send(&rocket(2)).unwrap();

        handler.process_landing().await.unwrap();
        assert_eq!(handler.revealed_segments().len(), 1);
        assert!(!handler.has_pending_landing());
        assert!(handler.process_landing().await.is_none());
    }

    #[tokio::test]
    async fn reset_marker_clears_progress_and_pending_landing() {
        let hub = LocalHub::new();
        let mut handler = handler_on(&hub);
        handler.connect().unwrap();

        let mut sender_side = hub.channel();
        sender_side.connect().unwrap();

        sender_side.send(&rocket(1)).unwrap();
        handler.process_landing().await.unwrap();
        assert_eq!(handler.revealed_segments().len(), 1);

        sender_side.send(&rocket(2)).unwrap();
        sender_side
            .send(&GameEvent::RocketIncoming {
                rocket_id: RocketId::reset(),
            })
            .unwrap();

        assert!(!handler.has_pending_landing());
        assert!(handler.revealed_segments().is_empty());
    }

    #[tokio::test]
    async fn four_landings_complete_the_transmission() {
        let hub = LocalHub::new();
        let mut handler = handler_on(&hub);
        handler.connect().unwrap();

        let mut sender_side = hub.channel();
        sender_side.connect().unwrap();

        for id in 1..=4 {
            sender_side.send(&rocket(id)).unwrap();
            handler.process_landing().await.unwrap();
        }
        assert!(handler.is_complete());
    }
}
