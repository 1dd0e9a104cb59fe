//! Phased signup core.
//!
//! Data flows one way: raw input goes through the sanitizer into the session's
//! store, the validation error set is recomputed from the whole draft, and a
//! valid draft is submitted once by [`submit_first_phase`]. The service's
//! answer either completes phase one (storing the second-phase payload) or is
//! reported as a failure with the draft left as it was.
//!
//! Nothing here is global: each [`RegistrationSession`] owns its store and is
//! passed by reference to whoever renders or submits it.

pub mod fields;
pub mod sanitize;
pub mod session;
pub mod store;
pub mod submit;
pub mod validation;

pub use fields::{Carrier, DigitField, Field};
pub use sanitize::{sanitize, Sanitized};
pub use session::{
    PendingSubmission, RegistrationSession, SubmissionFailure, SubmissionState, SubmitOutcome,
    SubmitRefusal, UpdateOutcome,
};
pub use store::{RegistrationDraft, RegistrationStore, SecondPhasePayload, StoreUpdate};
pub use submit::submit_first_phase;
pub use validation::{is_form_valid, validate, FieldError, ValidationErrors};
