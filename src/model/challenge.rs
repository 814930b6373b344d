use crate::model::{Answer, Rocket};
use futures_timer::Delay;
use instant::Instant;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ChallengeState {
    #[default]
    Waiting,
    Checking,
    Success,
    Failed,
}

/// Delays driving the visual feedback cycle. Defaults match the original
/// game: 1.5 s spinner before the verdict, 0.5 s before the indicator
/// resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeTiming {
    pub evaluation: Duration,
    pub cooldown: Duration,
}

impl Default for ChallengeTiming {
    fn default() -> Self {
        ChallengeTiming {
            evaluation: Duration::from_millis(1500),
            cooldown: Duration::from_millis(500),
        }
    }
}

/// Emitted exactly once per session, on the first successful settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Launch {
    pub rocket_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub solved: bool,
    pub launch: Option<Launch>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChallengeError {
    #[error("challenge is not accepting submissions while {0:?}")]
    NotWaiting(ChallengeState),
    #[error("no submission is being checked")]
    NothingToSettle,
}

/// One puzzle instance. The same machine serves all four puzzle kinds; only
/// the comparison predicate differs.
///
/// Transitions are explicit methods so they can be driven (and tested)
/// without timers; [`ChallengeSession::run`] sequences them with cancellable
/// delays. Dropping the `run` future drops its pending timers, so a session
/// discarded mid-cycle never mutates anything afterwards.
pub struct ChallengeSession {
    rocket_id: u32,
    state: ChallengeState,
    check: Box<dyn Fn(&Answer) -> bool>,
    timing: ChallengeTiming,
    verdict: Option<bool>,
    launched: bool,
    opened: Instant,
    solved_in: Option<Duration>,
}

impl fmt::Debug for ChallengeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChallengeSession")
            .field("rocket_id", &self.rocket_id)
            .field("state", &self.state)
            .field("launched", &self.launched)
            .finish()
    }
}

impl ChallengeSession {
    pub fn new(rocket_id: u32, check: impl Fn(&Answer) -> bool + 'static) -> Self {
        ChallengeSession {
            rocket_id,
            state: ChallengeState::Waiting,
            check: Box::new(check),
            timing: ChallengeTiming::default(),
            verdict: None,
            launched: false,
            opened: Instant::now(),
            solved_in: None,
        }
    }

    pub fn for_rocket(rocket: &Rocket) -> Self {
        let kind = rocket.kind.clone();
        ChallengeSession::new(rocket.id, move |answer| kind.check(answer))
    }

    pub fn with_timing(mut self, timing: ChallengeTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn rocket_id(&self) -> u32 {
        self.rocket_id
    }

    pub fn state(&self) -> ChallengeState {
        self.state
    }

    /// How long the player took, measured from session open to the first
    /// successful settle.
    pub fn solved_in(&self) -> Option<Duration> {
        self.solved_in
    }

    /// `Waiting -> Checking`. The predicate runs now; the verdict is parked
    /// until [`ChallengeSession::settle`].
    pub fn submit(&mut self, answer: &Answer) -> Result<(), ChallengeError> {
        if self.state != ChallengeState::Waiting {
            return Err(ChallengeError::NotWaiting(self.state));
        }
        self.verdict = Some((self.check)(answer));
        self.state = ChallengeState::Checking;
        Ok(())
    }

    /// `Checking -> Success | Failed`. Returns a [`Launch`] only on the
    /// first transition into `Success`.
    pub fn settle(&mut self) -> Result<Option<Launch>, ChallengeError> {
        if self.state != ChallengeState::Checking {
            return Err(ChallengeError::NothingToSettle);
        }
        match self.verdict.take() {
            Some(true) => {
                self.state = ChallengeState::Success;
                if self.launched {
                    Ok(None)
                } else {
                    self.launched = true;
                    self.solved_in = Some(self.opened.elapsed());
                    Ok(Some(Launch {
                        rocket_id: self.rocket_id,
                    }))
                }
            }
            _ => {
                self.state = ChallengeState::Failed;
                Ok(None)
            }
        }
    }

    /// `Success | Failed -> Waiting`, so the indicator can reset.
    pub fn reset(&mut self) {
        if matches!(self.state, ChallengeState::Success | ChallengeState::Failed) {
            self.state = ChallengeState::Waiting;
        }
    }

    /// Drive one full submission cycle: submit, wait out the evaluation
    /// delay, settle, wait out the cooldown, reset.
    pub async fn run(&mut self, answer: &Answer) -> Result<SubmissionOutcome, ChallengeError> {
        self.submit(answer)?;
        Delay::new(self.timing.evaluation).await;
        let launch = self.settle()?;
        let solved = self.state == ChallengeState::Success;
        Delay::new(self.timing.cooldown).await;
        self.reset();
        Ok(SubmissionOutcome { solved, launch })
    }
}
