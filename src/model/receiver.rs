use crate::model::RocketId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Title,
    Subtitle,
    Image,
    Button,
}

/// One unit of the transmission the receiver reassembles, revealed per
/// landed rocket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: u32,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: SegmentKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LandingState {
    Idle,
    Landing { rocket_id: RocketId },
}

/// What [`ReceiverProgress::observe`] did with an incoming rocket id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingAction {
    /// A landing began; complete it after the landing delay.
    Started,
    /// A landing was already in flight; the event is dropped.
    Ignored,
    /// The reset marker arrived; revealed segments were cleared.
    Cleared,
}

/// Receiver-side progress: an explicit two-state landing machine plus the
/// ordered list of segments revealed so far. Duplicate `rocketIncoming`
/// events during a landing are ignored by state, not by an ad hoc flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverProgress {
    segments: Vec<Segment>,
    revealed: usize,
    landing: LandingState,
}

impl ReceiverProgress {
    pub fn new(segments: Vec<Segment>) -> Self {
        ReceiverProgress {
            segments,
            revealed: 0,
            landing: LandingState::Idle,
        }
    }

    /// The transmission from the original game.
    pub fn default_transmission() -> Self {
        ReceiverProgress::new(vec![
            Segment {
                id: 1,
                content: "Software Engineering".to_string(),
                kind: SegmentKind::Title,
            },
            Segment {
                id: 2,
                content: "The Hashemite University".to_string(),
                kind: SegmentKind::Subtitle,
            },
            Segment {
                id: 3,
                content: "https://images.unsplash.com/photo-1461749280684-dccba630e2f6"
                    .to_string(),
                kind: SegmentKind::Image,
            },
            Segment {
                id: 4,
                content: "CLICK ME".to_string(),
                kind: SegmentKind::Button,
            },
        ])
    }

    pub fn landing(&self) -> &LandingState {
        &self.landing
    }

    pub fn revealed(&self) -> &[Segment] {
        &self.segments[..self.revealed]
    }

    pub fn is_complete(&self) -> bool {
        self.revealed == self.segments.len()
    }

    /// React to a `rocketIncoming` id.
    pub fn observe(&mut self, rocket_id: &RocketId) -> LandingAction {
        if rocket_id.is_reset() {
            self.revealed = 0;
            self.landing = LandingState::Idle;
            return LandingAction::Cleared;
        }
        if matches!(self.landing, LandingState::Landing { .. }) {
            return LandingAction::Ignored;
        }
        self.landing = LandingState::Landing {
            rocket_id: rocket_id.clone(),
        };
        LandingAction::Started
    }

    /// Finish the landing in flight, revealing the next segment if one is
    /// left. Returns the segment just revealed.
    pub fn complete_landing(&mut self) -> Option<&Segment> {
        match self.landing {
            LandingState::Landing { .. } => {
                self.landing = LandingState::Idle;
                if self.revealed < self.segments.len() {
                    self.revealed += 1;
                    self.segments.get(self.revealed - 1)
                } else {
                    None
                }
            }
            LandingState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landing_reveals_segments_in_order() {
        let mut progress = ReceiverProgress::default_transmission();

        assert_eq!(progress.observe(&RocketId::Id(1)), LandingAction::Started);
        let segment = progress.complete_landing().unwrap();
        assert_eq!(segment.id, 1);
        assert_eq!(segment.kind, SegmentKind::Title);

        assert_eq!(progress.observe(&RocketId::Id(2)), LandingAction::Started);
        assert_eq!(progress.complete_landing().unwrap().id, 2);
        assert_eq!(progress.revealed().len(), 2);
        assert!(!progress.is_complete());
    }

    #[test]
    fn duplicate_event_during_landing_is_ignored() {
        let mut progress = ReceiverProgress::default_transmission();

        assert_eq!(progress.observe(&RocketId::Id(1)), LandingAction::Started);
        assert_eq!(progress.observe(&RocketId::Id(1)), LandingAction::Ignored);
        assert_eq!(progress.observe(&RocketId::Id(2)), LandingAction::Ignored);

        progress.complete_landing();
        assert_eq!(progress.revealed().len(), 1);
    }

    #[test]
    fn reset_marker_clears_revealed_segments() {
        let mut progress = ReceiverProgress::default_transmission();

        progress.observe(&RocketId::Id(1));
        progress.complete_landing();
        assert_eq!(progress.revealed().len(), 1);

        assert_eq!(progress.observe(&RocketId::reset()), LandingAction::Cleared);
        assert!(progress.revealed().is_empty());
        assert_eq!(progress.landing(), &LandingState::Idle);
    }

    #[test]
    fn landing_past_the_last_segment_reveals_nothing() {
        let mut progress = ReceiverProgress::default_transmission();

        for id in 1..=4 {
            progress.observe(&RocketId::Id(id));
            progress.complete_landing();
        }
        assert!(progress.is_complete());

        progress.observe(&RocketId::Id(9));
        assert!(progress.complete_landing().is_none());
        assert!(progress.is_complete());
    }

    #[test]
    fn complete_landing_while_idle_is_a_no_op() {
        let mut progress = ReceiverProgress::default_transmission();
        assert!(progress.complete_landing().is_none());
        assert!(progress.revealed().is_empty());
    }
}
