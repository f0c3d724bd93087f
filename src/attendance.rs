use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::Clock;
use crate::model::attendance::AttendanceRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    NotCheckedIn,
    CheckedIn,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Success,
    Failure,
}

/// External identity check gating every check-in/out transition.
/// The real biometric step lives behind this seam; tests inject
/// deterministic outcomes.
#[allow(async_fn_in_trait)]
pub trait VerificationProvider {
    async fn verify(&self) -> VerificationOutcome;
}

/// Stand-in for the real face verification: resolves after a fixed delay
/// with a preconfigured outcome.
pub struct SimulatedVerification {
    delay: Duration,
    outcome: VerificationOutcome,
}

impl SimulatedVerification {
    pub fn succeeding(delay: Duration) -> Self {
        Self {
            delay,
            outcome: VerificationOutcome::Success,
        }
    }

    pub fn with_outcome(delay: Duration, outcome: VerificationOutcome) -> Self {
        Self { delay, outcome }
    }
}

impl VerificationProvider for SimulatedVerification {
    async fn verify(&self) -> VerificationOutcome {
        tokio::time::sleep(self.delay).await;
        self.outcome
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum AttendanceError {
    /// The session is terminal for the day; no further transitions.
    #[display(fmt = "attendance for the day is already completed")]
    InvalidStateTransition,
    #[display(fmt = "verification failed")]
    VerificationFailed,
}

/// Successful transition, carrying the stamped time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckEvent {
    CheckedIn(DateTime<Utc>),
    CheckedOut(DateTime<Utc>),
}

/// One worker's check-in/check-out state for a single day.
///
/// Created fresh each time the attendance screen opens and dropped when it
/// closes; nothing here outlives the screen or is shared across tasks.
pub struct AttendanceSession {
    date: NaiveDate,
    location_label: String,
    status: AttendanceStatus,
    check_in: Option<DateTime<Utc>>,
    check_out: Option<DateTime<Utc>>,
    location: Option<String>,
}

impl AttendanceSession {
    pub fn new(clock: &impl Clock, location_label: impl Into<String>) -> Self {
        Self {
            date: clock.today(),
            location_label: location_label.into(),
            status: AttendanceStatus::NotCheckedIn,
            check_in: None,
            check_out: None,
            location: None,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn status(&self) -> AttendanceStatus {
        self.status
    }

    pub fn check_in(&self) -> Option<DateTime<Utc>> {
        self.check_in
    }

    pub fn check_out(&self) -> Option<DateTime<Utc>> {
        self.check_out
    }

    /// Set at check-in; `None` before that.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Runs the external verification step and, on success, advances the
    /// state machine: first call checks in, second checks out, anything
    /// after that is rejected. The UI disables its button once completed,
    /// but the guard here holds regardless of the caller.
    ///
    /// The status is re-examined after the await, so a verification that
    /// resolves against a session already terminal is discarded rather
    /// than applied.
    pub async fn record_verification(
        &mut self,
        provider: &impl VerificationProvider,
        clock: &impl Clock,
    ) -> Result<CheckEvent, AttendanceError> {
        if self.status == AttendanceStatus::Completed {
            return Err(AttendanceError::InvalidStateTransition);
        }

        match provider.verify().await {
            VerificationOutcome::Failure => {
                debug!(date = %self.date, "verification failed, state unchanged");
                Err(AttendanceError::VerificationFailed)
            }
            VerificationOutcome::Success => self.apply(clock.now()),
        }
    }

    fn apply(&mut self, now: DateTime<Utc>) -> Result<CheckEvent, AttendanceError> {
        match self.status {
            AttendanceStatus::NotCheckedIn => {
                self.check_in = Some(now);
                self.location = Some(self.location_label.clone());
                self.status = AttendanceStatus::CheckedIn;
                Ok(CheckEvent::CheckedIn(now))
            }
            AttendanceStatus::CheckedIn => {
                self.check_out = Some(now);
                self.status = AttendanceStatus::Completed;
                Ok(CheckEvent::CheckedOut(now))
            }
            AttendanceStatus::Completed => Err(AttendanceError::InvalidStateTransition),
        }
    }

    /// Snapshot for the attendance summary display.
    pub fn record(&self) -> AttendanceRecord {
        AttendanceRecord {
            date: self.date,
            status: self.status,
            check_in: self.check_in,
            check_out: self.check_out,
            location: self.location.clone(),
        }
    }
}
