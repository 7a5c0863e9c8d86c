//! Registration session and submission controller
//!
//! A [`RegistrationSession`] owns one draft record and drives it through
//!
//! ```text
//! Idle -> Validating -> Invalid                      (back to Idle, no request)
//!                    -> Submitting -> Success | Error (back to Idle)
//! ```
//!
//! Validation and the status update are synchronous; only the transport call
//! is awaited. The state lock is never held across that await, so readers
//! (rendering, status checks, cancel) stay responsive while a request is in
//! flight.
//!
//! Two behaviors differ from a naive form handler:
//!
//! - A submit issued while another submit of the same session is still in
//!   flight is ignored ([`SubmitOutcome::Ignored`]) instead of sending a
//!   second request.
//! - Cancel clears the field errors together with the draft, so errors for
//!   values that no longer exist are not left on screen. The submission
//!   status is kept until the next submit.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use signup_common::{Field, RegistrationRecord, SubmissionStatus};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::transport::RegistrationTransport;
use crate::validator::{validate, FieldErrors};

/// Session errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session state lock poisoned while {0}")]
    StatePoisoned(&'static str),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Whether a request is currently in flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ControllerPhase {
    #[default]
    Idle,
    Submitting,
}

/// Result of one submit action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; no request was sent
    Invalid(FieldErrors),
    /// A request was sent and finished with this status
    Completed(SubmissionStatus),
    /// Another submit was still in flight; nothing happened
    Ignored,
}

/// Point-in-time copy of everything the form displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub record: RegistrationRecord,
    pub errors: FieldErrors,
    pub status: SubmissionStatus,
    pub phase: ControllerPhase,
}

#[derive(Debug, Default)]
struct SessionState {
    record: RegistrationRecord,
    errors: FieldErrors,
    status: SubmissionStatus,
    phase: ControllerPhase,
}

/// One user's form session
pub struct RegistrationSession<T> {
    transport: T,
    state: RwLock<SessionState>,
    clock: fn() -> i32,
}

impl<T> RegistrationSession<T>
where
    T: RegistrationTransport,
{
    /// New session with an empty draft, checking years against the local clock
    pub fn new(transport: T) -> Self {
        Self::with_clock(transport, signup_common::time::current_year)
    }

    /// New session with a custom source for the current year
    pub fn with_clock(transport: T, clock: fn() -> i32) -> Self {
        Self {
            transport,
            state: RwLock::new(SessionState::default()),
            clock,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Update one field of the draft
    pub fn set_field(&self, field: Field, value: impl Into<String>) -> SessionResult<()> {
        let mut state = write_lock(&self.state, "updating a field")?;
        state.record.set(field, value);
        Ok(())
    }

    /// Replace the whole draft
    pub fn set_record(&self, record: RegistrationRecord) -> SessionResult<()> {
        let mut state = write_lock(&self.state, "replacing the draft")?;
        state.record = record;
        Ok(())
    }

    pub fn record(&self) -> SessionResult<RegistrationRecord> {
        Ok(read_lock(&self.state, "reading the draft")?.record.clone())
    }

    pub fn errors(&self) -> SessionResult<FieldErrors> {
        Ok(read_lock(&self.state, "reading field errors")?.errors.clone())
    }

    pub fn status(&self) -> SessionResult<SubmissionStatus> {
        Ok(read_lock(&self.state, "reading submission status")?.status)
    }

    pub fn phase(&self) -> SessionResult<ControllerPhase> {
        Ok(read_lock(&self.state, "reading controller phase")?.phase)
    }

    pub fn snapshot(&self) -> SessionResult<FormSnapshot> {
        let state = read_lock(&self.state, "taking a snapshot")?;
        Ok(FormSnapshot {
            record: state.record.clone(),
            errors: state.errors.clone(),
            status: state.status,
            phase: state.phase,
        })
    }

    /// Reset the draft to empty and clear field errors
    ///
    /// The submission status is untouched, and a request already in flight
    /// still reports its outcome when it finishes.
    pub fn cancel(&self) -> SessionResult<()> {
        let mut state = write_lock(&self.state, "cancelling the draft")?;
        state.record = RegistrationRecord::default();
        state.errors = FieldErrors::new();
        debug!("Registration draft cleared");
        Ok(())
    }

    /// Validate the draft and, if valid, send it once
    pub async fn submit(&self) -> SessionResult<SubmitOutcome> {
        let (record, in_flight) = {
            let mut state = write_lock(&self.state, "starting a submit")?;
            if state.phase == ControllerPhase::Submitting {
                debug!("Submit ignored, a registration request is already in flight");
                return Ok(SubmitOutcome::Ignored);
            }

            let errors = validate(&state.record, (self.clock)());
            state.errors = errors.clone();
            if !errors.is_valid() {
                return Ok(SubmitOutcome::Invalid(errors));
            }

            state.phase = ControllerPhase::Submitting;
            (state.record.clone(), InFlight { state: &self.state })
        };

        info!("Submitting registration");
        let status = match self.transport.create_user(&record).await {
            Ok(response) => {
                let status = response.status();
                if status == SubmissionStatus::Success {
                    info!("User account created");
                } else {
                    warn!(
                        title = ?response.title,
                        message = ?response.message,
                        "Create-user endpoint did not report success"
                    );
                }
                status
            }
            Err(e) => {
                error!("Error submitting registration: {}", e);
                SubmissionStatus::Error
            }
        };

        {
            let mut state = write_lock(&self.state, "recording the submit outcome")?;
            state.status = status;
        }
        drop(in_flight);

        Ok(SubmitOutcome::Completed(status))
    }
}

/// Returns the session to Idle when the in-flight submit finishes or its
/// future is dropped mid-request.
struct InFlight<'a> {
    state: &'a RwLock<SessionState>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.phase = ControllerPhase::Idle;
    }
}

fn read_lock<'a, S>(
    lock: &'a RwLock<S>,
    context: &'static str,
) -> SessionResult<RwLockReadGuard<'a, S>> {
    lock.read().map_err(|_| SessionError::StatePoisoned(context))
}

fn write_lock<'a, S>(
    lock: &'a RwLock<S>,
    context: &'static str,
) -> SessionResult<RwLockWriteGuard<'a, S>> {
    lock.write().map_err(|_| SessionError::StatePoisoned(context))
}
