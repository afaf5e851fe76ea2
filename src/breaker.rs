//! Circuit breaker guarding the analysis service.
//!
//! Three states: `Closed` (normal traffic), `Open` (fail fast, no network
//! attempt), `HalfOpen` (exactly one trial call probes recovery). The
//! breaker settles once per top-level call — retries happen *inside* a
//! single permitted call, so a call that exhausts its retry budget counts
//! as one failure here.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::{AnalyzerError, CircuitBreakerConfig};

/// Snapshot of the breaker's current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation, calls pass through.
    Closed,
    /// Failing fast; calls are rejected without touching the network.
    Open,
    /// One trial call is in flight, deciding between `Closed` and `Open`.
    HalfOpen,
}

#[derive(Debug)]
enum State {
    Closed,
    Open { opened_at: Instant },
    HalfOpen,
}

#[derive(Debug)]
struct Inner {
    state: State,
    consecutive_failures: u32,
    last_failure_at: Option<Instant>,
}

/// Permit for one breaker-gated call, returned by
/// [`CircuitBreaker::before_call`].
///
/// The permit must settle via [`CallPermit::success`] or
/// [`CallPermit::failure`] once the call's final outcome is known. Dropping
/// it unsettled means the caller cancelled: that never counts toward the
/// failure threshold, but an abandoned half-open *trial* re-opens the
/// circuit so the next cooldown can grant a fresh probe. While a trial
/// permit exists, no second trial can be granted.
#[must_use = "the permit must settle via success() or failure()"]
pub struct CallPermit {
    breaker: CircuitBreaker,
    trial: bool,
    settled: bool,
}

impl fmt::Debug for CallPermit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallPermit")
            .field("trial", &self.trial)
            .field("settled", &self.settled)
            .finish()
    }
}

impl CallPermit {
    /// Records the call as successful: failure count resets, and a trial
    /// closes the circuit.
    pub fn success(mut self) {
        self.settled = true;
        self.breaker.on_success();
    }

    /// Records the call as failed: the count grows toward the threshold,
    /// and a failed trial re-opens the circuit.
    pub fn failure(mut self) {
        self.settled = true;
        self.breaker.on_failure();
    }
}

impl Drop for CallPermit {
    fn drop(&mut self) {
        if !self.settled && self.trial {
            self.breaker.revert_abandoned_trial();
        }
    }
}

/// Mutex-guarded failure-tracking state machine.
///
/// Cloning shares the underlying state, so every handle observes the same
/// circuit. Timestamps come from `tokio::time::Instant`, which makes the
/// time-dependent transitions testable under a paused runtime clock.
#[derive(Clone, Debug)]
pub struct CircuitBreaker {
    config: Arc<CircuitBreakerConfig>,
    inner: Arc<Mutex<Inner>>,
}

impl CircuitBreaker {
    pub fn new(mut config: CircuitBreakerConfig) -> Self {
        // A threshold of 0 would be indistinguishable from 1; clamp it.
        config.failure_threshold = config.failure_threshold.max(1);
        Self {
            config: Arc::new(config),
            inner: Arc::new(Mutex::new(Inner {
                state: State::Closed,
                consecutive_failures: 0,
                last_failure_at: None,
            })),
        }
    }

    /// Decides whether a call may proceed, returning the permit that must
    /// settle the call's outcome.
    ///
    /// Returns `Err` with a `CircuitOpen` error without any network attempt
    /// while the circuit is open and the reset timeout has not elapsed.
    /// Entering `HalfOpen` hands out the single trial permit: concurrent
    /// callers are rejected until that permit settles or is dropped,
    /// however long the trial takes.
    pub fn before_call(&self) -> Result<CallPermit, AnalyzerError> {
        let mut inner = self.lock();
        let now = Instant::now();

        let trial = match inner.state {
            State::Closed => false,
            State::Open { opened_at } => {
                if now.duration_since(opened_at) >= self.config.reset_timeout {
                    debug!("circuit breaker half-open, permitting one trial call");
                    inner.state = State::HalfOpen;
                    true
                } else {
                    return Err(AnalyzerError::circuit_open());
                }
            }
            // The running trial owns the only permit.
            State::HalfOpen => return Err(AnalyzerError::circuit_open()),
        };

        Ok(CallPermit {
            breaker: self.clone(),
            trial,
            settled: false,
        })
    }

    /// Current state snapshot. Time-based transitions happen lazily in
    /// [`CircuitBreaker::before_call`], so an expired `Open` still reads as
    /// `Open` until the next call probes it.
    pub fn state(&self) -> CircuitState {
        match self.lock().state {
            State::Closed => CircuitState::Closed,
            State::Open { .. } => CircuitState::Open,
            State::HalfOpen => CircuitState::HalfOpen,
        }
    }

    /// Current consecutive-failure count.
    pub fn failure_count(&self) -> u32 {
        self.lock().consecutive_failures
    }

    fn on_success(&self) {
        let mut inner = self.lock();
        inner.consecutive_failures = 0;
        inner.last_failure_at = None;
        if !matches!(inner.state, State::Closed) {
            debug!("circuit breaker closed");
            inner.state = State::Closed;
        }
    }

    fn on_failure(&self) {
        let mut inner = self.lock();
        let now = Instant::now();

        match inner.state {
            State::Closed => {
                // Failures further apart than the monitoring period are not
                // consecutive: restart the count instead of accumulating.
                if inner
                    .last_failure_at
                    .is_some_and(|last| now.duration_since(last) > self.config.monitoring_period)
                {
                    inner.consecutive_failures = 0;
                }
                inner.consecutive_failures += 1;
                inner.last_failure_at = Some(now);

                if inner.consecutive_failures >= self.config.failure_threshold {
                    warn!(
                        failures = inner.consecutive_failures,
                        "circuit breaker opened"
                    );
                    inner.state = State::Open { opened_at: now };
                }
            }
            State::HalfOpen => {
                inner.consecutive_failures += 1;
                inner.last_failure_at = Some(now);
                warn!("trial call failed, circuit breaker re-opened");
                inner.state = State::Open { opened_at: now };
            }
            State::Open { .. } => {
                inner.consecutive_failures += 1;
                inner.last_failure_at = Some(now);
            }
        }
    }

    fn revert_abandoned_trial(&self) {
        let mut inner = self.lock();
        if matches!(inner.state, State::HalfOpen) {
            warn!("trial call abandoned, circuit breaker re-opened");
            inner.state = State::Open {
                opened_at: Instant::now(),
            };
        }
    }

    // State is plain data; a panic while holding the guard cannot leave it
    // torn, so a poisoned lock is still safe to reuse.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
