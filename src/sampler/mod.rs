//! Periodic sampling loop with interruptible waits.
//!
//! [`run`] calls a [`MetricsProvider`] once per interval, hands every result
//! (or failure) to a [`Render`], and stops on cancellation, on timeout, or
//! when the provider reports a non-recoverable condition.

mod cancel;
mod session;

use std::time::Duration;

use thiserror::Error;
use tracing::Instrument;

use crate::system::snapshot::Sample;

pub use cancel::{CancelToken, install_ctrl_c};
pub use session::SamplerState;
use session::Session;

pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// One sample could not be taken; the next tick may succeed.
    #[error("sample unavailable: {0}")]
    Transient(String),
    #[error("provider failed permanently: {0}")]
    Fatal(String),
}

impl ProviderError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProviderError::Fatal(_))
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("interval must be a positive number of seconds, got {0}")]
    InvalidInterval(f64),
    #[error("max duration must be a non-negative number of seconds, got {0}")]
    InvalidDuration(f64),
}

pub trait MetricsProvider {
    fn sample(&mut self) -> Result<Sample, ProviderError>;
}

impl<F> MetricsProvider for F
where
    F: FnMut() -> Result<Sample, ProviderError>,
{
    fn sample(&mut self) -> Result<Sample, ProviderError> {
        self()
    }
}

/// What the loop hands to the renderer on each tick.
#[derive(Debug, Clone, Copy)]
pub enum Tick<'a> {
    Sample { index: u64, sample: &'a Sample },
    Gap { index: u64, error: &'a ProviderError },
}

impl Tick<'_> {
    pub fn index(&self) -> u64 {
        match self {
            Tick::Sample { index, .. } | Tick::Gap { index, .. } => *index,
        }
    }
}

pub trait Render {
    fn render(&mut self, tick: Tick<'_>);
}

impl<F> Render for F
where
    F: FnMut(Tick<'_>),
{
    fn render(&mut self, tick: Tick<'_>) {
        self(tick)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Cancelled,
    TimedOut,
    ProviderFatal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SamplerSettings {
    interval: Duration,
    max_duration: Option<Duration>,
    max_consecutive_failures: u32,
}

impl SamplerSettings {
    pub fn new(interval_secs: f64, max_duration_secs: Option<f64>) -> Result<Self, SettingsError> {
        let interval = Duration::try_from_secs_f64(interval_secs)
            .ok()
            .filter(|d| !d.is_zero())
            .ok_or(SettingsError::InvalidInterval(interval_secs))?;
        let max_duration = max_duration_secs
            .map(|secs| {
                Duration::try_from_secs_f64(secs).map_err(|_| SettingsError::InvalidDuration(secs))
            })
            .transpose()?;

        Self::from_durations(interval, max_duration).map_err(|err| match err {
            SettingsError::InvalidInterval(_) => SettingsError::InvalidInterval(interval_secs),
            SettingsError::InvalidDuration(_) => {
                SettingsError::InvalidDuration(max_duration_secs.unwrap_or_default())
            }
        })
    }

    pub fn from_durations(
        interval: Duration,
        max_duration: Option<Duration>,
    ) -> Result<Self, SettingsError> {
        let now = tokio::time::Instant::now();
        if interval.is_zero() || now.checked_add(interval).is_none() {
            return Err(SettingsError::InvalidInterval(interval.as_secs_f64()));
        }
        if let Some(max) = max_duration {
            if now.checked_add(max).is_none() {
                return Err(SettingsError::InvalidDuration(max.as_secs_f64()));
            }
        }
        Ok(Self {
            interval,
            max_duration,
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
        })
    }

    /// `0` disables escalation of repeated transient failures.
    pub fn with_max_consecutive_failures(mut self, n: u32) -> Self {
        self.max_consecutive_failures = n;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration
    }

    pub fn max_consecutive_failures(&self) -> u32 {
        self.max_consecutive_failures
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub reason: ExitReason,
    pub ticks: u64,
    pub failed: u64,
    pub last_error: Option<ProviderError>,
}

impl RunSummary {
    pub fn samples(&self) -> u64 {
        self.ticks - self.failed
    }
}

/// Drive the sampling loop until cancellation, timeout or a fatal provider
/// error.
///
/// The first tick always runs. After every render the loop checks the
/// cancellation flag and the deadline; the wait between ticks wakes early on
/// cancellation.
pub async fn run<P, R>(
    provider: &mut P,
    render: &mut R,
    settings: &SamplerSettings,
    cancel: &CancelToken,
) -> RunSummary
where
    P: MetricsProvider + ?Sized,
    R: Render + ?Sized,
{
    let span = tracing::info_span!(
        "sampler.run",
        interval_ms = millis(settings.interval),
        max_duration_ms = settings.max_duration.map(millis),
    );
    run_session(provider, render, settings, cancel)
        .instrument(span)
        .await
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

async fn run_session<P, R>(
    provider: &mut P,
    render: &mut R,
    settings: &SamplerSettings,
    cancel: &CancelToken,
) -> RunSummary
where
    P: MetricsProvider + ?Sized,
    R: Render + ?Sized,
{
    let mut session = Session::start(settings);
    tracing::info!("sampler started");

    let reason = loop {
        session.transition(SamplerState::Sampling);
        let fatal = sample_once(&mut session, provider, render);
        session.finish_tick();

        if fatal {
            break ExitReason::ProviderFatal;
        }
        if cancel.is_cancelled() {
            break ExitReason::Cancelled;
        }
        if session.timed_out() {
            break ExitReason::TimedOut;
        }

        session.transition(SamplerState::Waiting);
        if session.next_tick_past_deadline() {
            if let Some(deadline) = session.deadline() {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break ExitReason::Cancelled,
                    _ = tokio::time::sleep_until(deadline) => break ExitReason::TimedOut,
                }
            }
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break ExitReason::Cancelled,
            _ = tokio::time::sleep_until(session.next_due()) => {}
        }
    };

    session.transition(SamplerState::Terminating);
    debug_assert_eq!(session.state(), SamplerState::Terminating);
    tracing::info!(
        reason = ?reason,
        ticks = session.ticks,
        failed = session.failed,
        "sampler stopped"
    );

    RunSummary {
        reason,
        ticks: session.ticks,
        failed: session.failed,
        last_error: session.last_error,
    }
}

/// Take and render one sample. Returns true when the run must end.
fn sample_once<P, R>(session: &mut Session, provider: &mut P, render: &mut R) -> bool
where
    P: MetricsProvider + ?Sized,
    R: Render + ?Sized,
{
    let index = session.ticks;
    let _tick = tracing::debug_span!("sampler.tick", index).entered();

    match provider.sample() {
        Ok(sample) => {
            session.record_success();
            render.render(Tick::Sample {
                index,
                sample: &sample,
            });
            false
        }
        Err(error) => {
            tracing::warn!(index, error = %error, "sample failed");
            render.render(Tick::Gap {
                index,
                error: &error,
            });
            session.record_failure(error)
        }
    }
}
