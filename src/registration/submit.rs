use super::session::{RegistrationSession, SubmitOutcome};
use crate::api::client::IdentityClient;
use tracing::{info, instrument};

/// Submits phase one for `session`: at most one request, no retries.
///
/// An invalid draft refreshes the error set and returns
/// `SubmitOutcome::Refused` without touching the network. Closing the
/// session while the request is outstanding resolves as `Cancelled`.
#[instrument(skip_all, fields(session_id = %session.id()))]
pub async fn submit_first_phase(
    session: &mut RegistrationSession,
    client: &IdentityClient,
) -> SubmitOutcome {
    let pending = match session.begin_submit() {
        Ok(pending) => pending,
        Err(refusal) => {
            info!("submission refused: {refusal}");
            return SubmitOutcome::Refused(refusal);
        }
    };

    let cancel = session.cancellation_token();
    let request = pending.request().clone();

    let result = tokio::select! {
        result = client.sign_up(&request) => Some(result),
        () = cancel.cancelled() => None,
    };

    match result {
        Some(result) => session.finish_submit(pending, result),
        None => session.abandon_submit(pending),
    }
}
