use std::time::Duration;

use tokio::time::Instant;

use super::{ProviderError, SamplerSettings};

/// Stand-in for a due time that does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    Idle,
    Sampling,
    Waiting,
    Terminating,
}

impl SamplerState {
    pub fn can_transition_to(self, next: SamplerState) -> bool {
        use SamplerState::*;
        matches!(
            (self, next),
            (Idle, Sampling)
                | (Sampling, Waiting)
                | (Waiting, Sampling)
                | (Sampling, Terminating)
                | (Waiting, Terminating)
                | (Terminating, Terminating)
        )
    }
}

/// Bookkeeping for one run of the sampling loop.
#[derive(Debug)]
pub(super) struct Session {
    start: Instant,
    interval: Duration,
    max_duration: Option<Duration>,
    max_consecutive_failures: u32,
    state: SamplerState,
    next_due: Instant,
    pub(super) ticks: u64,
    pub(super) failed: u64,
    consecutive_failures: u32,
    pub(super) last_error: Option<ProviderError>,
}

impl Session {
    pub(super) fn start(settings: &SamplerSettings) -> Self {
        let start = Instant::now();
        Session {
            start,
            interval: settings.interval(),
            max_duration: settings.max_duration(),
            max_consecutive_failures: settings.max_consecutive_failures(),
            state: SamplerState::Idle,
            next_due: start,
            ticks: 0,
            failed: 0,
            consecutive_failures: 0,
            last_error: None,
        }
    }

    pub(super) fn state(&self) -> SamplerState {
        self.state
    }

    pub(super) fn transition(&mut self, next: SamplerState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal sampler transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }

    /// Account for a finished tick and schedule the next one.
    ///
    /// A tick that overran its slot pushes the schedule back instead of
    /// replaying the missed slots.
    pub(super) fn finish_tick(&mut self) {
        self.ticks += 1;
        let now = Instant::now();
        let due = self
            .next_due
            .checked_add(self.interval)
            .unwrap_or_else(|| now + FAR_FUTURE);
        self.next_due = due.max(now);
    }

    pub(super) fn record_success(&mut self) {
        self.consecutive_failures = 0;
    }

    /// Returns true when this failure ends the run.
    pub(super) fn record_failure(&mut self, error: ProviderError) -> bool {
        self.failed += 1;
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        let escalated = self.max_consecutive_failures > 0
            && self.consecutive_failures >= self.max_consecutive_failures;
        let fatal = error.is_fatal() || escalated;
        if escalated && !error.is_fatal() {
            tracing::error!(
                consecutive = self.consecutive_failures,
                "provider kept failing, giving up"
            );
        }
        self.last_error = Some(error);
        fatal
    }

    pub(super) fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub(super) fn next_due(&self) -> Instant {
        self.next_due
    }

    pub(super) fn deadline(&self) -> Option<Instant> {
        self.max_duration
            .and_then(|max| self.start.checked_add(max))
    }

    pub(super) fn timed_out(&self) -> bool {
        self.max_duration
            .is_some_and(|max| self.elapsed() >= max)
    }

    /// True when the next scheduled tick would fall past the deadline.
    pub(super) fn next_tick_past_deadline(&self) -> bool {
        self.deadline().is_some_and(|deadline| self.next_due > deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_transitions() {
        use SamplerState::*;
        assert!(Idle.can_transition_to(Sampling));
        assert!(Sampling.can_transition_to(Waiting));
        assert!(Waiting.can_transition_to(Sampling));
        assert!(Sampling.can_transition_to(Terminating));
        assert!(Waiting.can_transition_to(Terminating));
        assert!(Terminating.can_transition_to(Terminating));
    }

    #[test]
    fn terminating_is_absorbing() {
        use SamplerState::*;
        for next in [Idle, Sampling, Waiting] {
            assert!(!Terminating.can_transition_to(next));
        }
        assert!(!Idle.can_transition_to(Waiting));
        assert!(!Idle.can_transition_to(Terminating));
    }

    #[tokio::test(start_paused = true)]
    async fn consecutive_failures_escalate_and_reset() {
        let settings = SamplerSettings::new(1.0, None)
            .unwrap()
            .with_max_consecutive_failures(2);
        let mut session = Session::start(&settings);
        assert!(!session.record_failure(ProviderError::Transient("a".into())));
        session.record_success();
        assert!(!session.record_failure(ProviderError::Transient("b".into())));
        assert!(session.record_failure(ProviderError::Transient("c".into())));
        assert_eq!(session.failed, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn overrun_does_not_replay_missed_slots() {
        let settings = SamplerSettings::new(1.0, None).unwrap();
        let mut session = Session::start(&settings);
        tokio::time::advance(Duration::from_millis(3500)).await;
        session.finish_tick();
        assert_eq!(session.next_due(), Instant::now());
    }

    #[tokio::test(start_paused = true)]
    async fn schedule_saturates_instead_of_overflowing() {
        let huge = Duration::from_secs(u64::MAX / 4);
        let settings = SamplerSettings::from_durations(huge, Some(huge)).unwrap();
        let mut session = Session::start(&settings);
        session.finish_tick();
        session.finish_tick();
        session.finish_tick();
        assert!(session.next_due() > Instant::now());
        assert!(!session.timed_out());
        assert!(session.deadline().is_some());
    }
}
