//! One signup session: owns the store, keeps the derived error set current
//! and runs the submission state machine.
//!
//! ```text
//! Editing --submit (valid)--> Submitting --ok--> FirstPhaseComplete
//!    ^                            |
//!    +---- edit/submit ---- SubmissionFailed <--err--+
//! ```
//!
//! Invalid submits never leave `Editing`. A response that arrives after the
//! draft changed, or after the session was closed, is discarded.

use super::{
    fields::{Carrier, Field, TooLong},
    sanitize::{sanitize, Sanitized},
    store::{RegistrationDraft, RegistrationStore, SecondPhasePayload, StoreUpdate},
    validation::{validate, ValidationErrors},
};
use crate::api::{error::ApiError, types::SignUpRequest};
use secrecy::SecretString;
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use ulid::Ulid;

/// Shown when a failure carries no usable text at all.
pub const SUBMIT_FALLBACK_MESSAGE: &str = "Signup failed. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionState {
    Editing,
    Submitting,
    FirstPhaseComplete,
    SubmissionFailed,
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Editing => "editing",
            Self::Submitting => "submitting",
            Self::FirstPhaseComplete => "first_phase_complete",
            Self::SubmissionFailed => "submission_failed",
        };
        formatter.write_str(name)
    }
}

/// Result of feeding one raw value into the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    /// Longer than the field bound; the prior value is kept.
    Rejected { len: usize, max: usize },
    /// Carrier value that names no known carrier; the prior value is kept.
    UnknownCarrier(String),
}

/// Why a submit did not start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitRefusal {
    /// The draft has errors; the refreshed set is attached.
    Invalid(ValidationErrors),
    /// A phase-one request for this session is already outstanding.
    InFlight,
    AlreadyCompleted,
    Closed,
}

impl fmt::Display for SubmitRefusal {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(errors) => write!(formatter, "form has {} invalid fields", errors.len()),
            Self::InFlight => formatter.write_str("a submission is already in flight"),
            Self::AlreadyCompleted => formatter.write_str("first phase already completed"),
            Self::Closed => formatter.write_str("session closed"),
        }
    }
}

/// User-visible submission failure. The draft is never modified by one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionFailure {
    /// The server answered with a structured `message`.
    Rejected { status: Option<u16>, message: String },
    /// No structured message: connectivity, timeout or an unreadable answer.
    Transport { message: String },
}

impl SubmissionFailure {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Rejected { message, .. } | Self::Transport { message } => message,
        }
    }
}

impl fmt::Display for SubmissionFailure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.message())
    }
}

impl From<&ApiError> for SubmissionFailure {
    fn from(err: &ApiError) -> Self {
        if let Some(message) = err.server_message() {
            let status = match err {
                ApiError::Http { status, .. } => Some(*status),
                _ => None,
            };
            return Self::Rejected {
                status,
                message: message.to_string(),
            };
        }

        let message = err.user_message();
        Self::Transport {
            message: if message.trim().is_empty() {
                SUBMIT_FALLBACK_MESSAGE.to_string()
            } else {
                message
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    Completed(SecondPhasePayload),
    Failed(SubmissionFailure),
    Refused(SubmitRefusal),
    /// The draft changed while the request was outstanding; the answer was dropped.
    Superseded,
    /// The session was closed while the request was outstanding.
    Cancelled,
}

/// Snapshot taken when a submit starts. Hand it back to
/// [`RegistrationSession::finish_submit`] with the service's answer.
#[derive(Debug)]
pub struct PendingSubmission {
    ticket: u64,
    revision: u64,
    request: SignUpRequest,
}

impl PendingSubmission {
    #[must_use]
    pub fn request(&self) -> &SignUpRequest {
        &self.request
    }
}

#[derive(Debug)]
pub struct RegistrationSession {
    id: Ulid,
    store: RegistrationStore,
    errors: ValidationErrors,
    state: SubmissionState,
    last_failure: Option<SubmissionFailure>,
    cancel: CancellationToken,
    next_ticket: u64,
    in_flight: Option<u64>,
}

impl Default for RegistrationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RegistrationSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl RegistrationSession {
    /// Starts a session with an empty draft.
    #[must_use]
    pub fn new() -> Self {
        let store = RegistrationStore::new();
        let errors = validate(store.draft());
        let id = Ulid::new();
        debug!(session_id = %id, "registration session started");

        Self {
            id,
            store,
            errors,
            state: SubmissionState::Editing,
            last_failure: None,
            cancel: CancellationToken::new(),
            next_ticket: 0,
            in_flight: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> Ulid {
        self.id
    }

    #[must_use]
    pub fn draft(&self) -> &RegistrationDraft {
        self.store.draft()
    }

    #[must_use]
    pub fn store(&self) -> &RegistrationStore {
        &self.store
    }

    #[must_use]
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Drives the submit button's enabled state.
    #[must_use]
    pub fn is_form_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.is_form_valid()
            && matches!(
                self.state,
                SubmissionState::Editing | SubmissionState::SubmissionFailed
            )
            && !self.cancel.is_cancelled()
    }

    #[must_use]
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    #[must_use]
    pub fn last_failure(&self) -> Option<&SubmissionFailure> {
        self.last_failure.as_ref()
    }

    #[must_use]
    pub fn first_phase_completed(&self) -> bool {
        self.store.first_phase_completed()
    }

    #[must_use]
    pub fn second_phase_payload(&self) -> Option<&SecondPhasePayload> {
        self.store.second_phase_payload()
    }

    /// Token cancelled when the session is closed or dropped.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Ends the session; an outstanding submission resolves as cancelled.
    pub fn close(&self) {
        debug!(session_id = %self.id, "registration session closed");
        self.cancel.cancel();
    }

    /// Sanitizes `raw` and writes it into `field`.
    pub fn update(&mut self, field: Field, raw: &str) -> UpdateOutcome {
        let value = match sanitize(field, raw) {
            Sanitized::Accepted(value) => value,
            Sanitized::Rejected { len, max } => {
                debug!(%field, len, max, "input over length bound rejected");
                return UpdateOutcome::Rejected { len, max };
            }
        };

        let update = match field {
            Field::FullName => StoreUpdate::FullName(value),
            Field::BirthDate => StoreUpdate::BirthDate(value),
            Field::NationalIdTail => StoreUpdate::NationalIdTail(SecretString::from(value)),
            Field::Carrier => match value.parse::<Carrier>() {
                Ok(carrier) => StoreUpdate::Carrier(carrier),
                Err(_) => return UpdateOutcome::UnknownCarrier(value),
            },
            Field::PhoneNumber => StoreUpdate::PhoneNumber(value),
            Field::LoginId => StoreUpdate::LoginId(value),
            Field::Password => StoreUpdate::Password(SecretString::from(value)),
            Field::Email => StoreUpdate::Email(value),
        };

        match self.apply(update) {
            Ok(()) => UpdateOutcome::Applied,
            Err(TooLong { len, max }) => UpdateOutcome::Rejected { len, max },
        }
    }

    /// Same as [`update`](Self::update) keyed by form name. Unknown names are
    /// a no-op and return `None`.
    pub fn update_named(&mut self, name: &str, raw: &str) -> Option<UpdateOutcome> {
        let field = name.parse::<Field>().ok()?;
        Some(self.update(field, raw))
    }

    pub fn set_carrier(&mut self, carrier: Carrier) {
        let _ = self.apply(StoreUpdate::Carrier(carrier));
    }

    /// Applies an update message and recomputes the error set.
    ///
    /// # Errors
    /// Returns `TooLong` when a bounded field would exceed its bound.
    pub fn apply(&mut self, update: StoreUpdate) -> Result<(), TooLong> {
        self.store.apply(update)?;
        self.refresh_validation();
        if self.state == SubmissionState::SubmissionFailed {
            self.state = SubmissionState::Editing;
        }
        Ok(())
    }

    /// Recomputes the error set from the current draft.
    pub fn refresh_validation(&mut self) -> &ValidationErrors {
        self.errors = validate(self.store.draft());
        &self.errors
    }

    /// Moves to `Submitting` and snapshots the request.
    ///
    /// # Errors
    /// Returns a refusal when the draft is invalid, a request is already in
    /// flight, phase one is done, or the session is closed. No state changes
    /// except the refreshed error set.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitRefusal> {
        if self.cancel.is_cancelled() {
            return Err(SubmitRefusal::Closed);
        }

        match self.state {
            SubmissionState::Submitting => return Err(SubmitRefusal::InFlight),
            SubmissionState::FirstPhaseComplete => return Err(SubmitRefusal::AlreadyCompleted),
            SubmissionState::Editing | SubmissionState::SubmissionFailed => {}
        }

        let errors = self.refresh_validation().clone();
        if !errors.is_empty() {
            self.state = SubmissionState::Editing;
            return Err(SubmitRefusal::Invalid(errors));
        }

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.in_flight = Some(ticket);
        self.last_failure = None;
        self.state = SubmissionState::Submitting;

        debug!(session_id = %self.id, ticket, "phase-one submission started");

        Ok(PendingSubmission {
            ticket,
            revision: self.store.revision(),
            request: SignUpRequest::from(self.store.draft()),
        })
    }

    /// Applies the service's answer for `pending`.
    pub fn finish_submit(
        &mut self,
        pending: PendingSubmission,
        result: Result<SecondPhasePayload, ApiError>,
    ) -> SubmitOutcome {
        if self.in_flight != Some(pending.ticket) {
            warn!(session_id = %self.id, ticket = pending.ticket, "dropping answer for unknown submission");
            return SubmitOutcome::Superseded;
        }
        self.in_flight = None;

        if self.cancel.is_cancelled() {
            self.state = SubmissionState::Editing;
            return SubmitOutcome::Cancelled;
        }

        match result {
            Ok(payload) => {
                if self.store.revision() != pending.revision {
                    warn!(
                        session_id = %self.id,
                        "draft changed while signup was in flight, discarding response"
                    );
                    self.state = SubmissionState::Editing;
                    return SubmitOutcome::Superseded;
                }

                self.store.complete_first_phase(payload.clone());
                self.state = SubmissionState::FirstPhaseComplete;
                info!(session_id = %self.id, "first phase completed");
                SubmitOutcome::Completed(payload)
            }
            Err(err) => {
                error!(session_id = %self.id, "phase-one signup failed: {err}");
                let failure = SubmissionFailure::from(&err);
                self.last_failure = Some(failure.clone());
                self.state = SubmissionState::SubmissionFailed;
                SubmitOutcome::Failed(failure)
            }
        }
    }

    /// Releases `pending` without an answer, used when the request was cancelled.
    pub fn abandon_submit(&mut self, pending: PendingSubmission) -> SubmitOutcome {
        if self.in_flight == Some(pending.ticket) {
            self.in_flight = None;
            self.state = SubmissionState::Editing;
        }
        debug!(session_id = %self.id, ticket = pending.ticket, "phase-one submission cancelled");
        SubmitOutcome::Cancelled
    }

    /// Discards the draft and any outstanding submission, keeping the session open.
    pub fn restart(&mut self) {
        self.store.reset();
        self.refresh_validation();
        self.state = SubmissionState::Editing;
        self.last_failure = None;
        self.in_flight = None;
    }
}
