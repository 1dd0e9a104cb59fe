use crate::{
    api::client::IdentityClient,
    cli::{commands::sign_up::Options, globals::GlobalArgs},
    registration::{
        fields::Field,
        session::{RegistrationSession, SubmitOutcome, SubmitRefusal, UpdateOutcome},
        submit::submit_first_phase,
    },
};
use anyhow::{anyhow, Result};
use secrecy::ExposeSecret;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub options: Options,
}

/// Feed the options into a fresh session, the same way a form would.
fn fill(session: &mut RegistrationSession, options: &Options) {
    let values = [
        (Field::FullName, options.full_name.as_str()),
        (Field::BirthDate, options.birth_date.as_str()),
        (Field::NationalIdTail, options.national_id_tail.expose_secret()),
        (Field::PhoneNumber, options.phone_number.as_str()),
        (Field::LoginId, options.login_id.as_str()),
        (Field::Password, options.password.expose_secret()),
        (Field::Email, options.email.as_str()),
    ];

    for (field, raw) in values {
        match session.update(field, raw) {
            UpdateOutcome::Applied => {}
            UpdateOutcome::Rejected { len, max } => {
                warn!(field = %field, len, max, "value too long, ignored");
            }
            UpdateOutcome::UnknownCarrier(value) => {
                warn!(field = %field, "unknown carrier: {value}");
            }
        }
    }

    session.set_carrier(options.carrier);
}

/// Run phase one of the signup flow and print the second-phase payload.
/// # Errors
/// Returns an error if the form is invalid, the service rejects the request,
/// or the run is interrupted.
pub async fn execute(args: Args) -> Result<()> {
    let client = IdentityClient::new(args.globals.client_config()?)?;

    let mut session = RegistrationSession::new();
    fill(&mut session, &args.options);
    debug!(session_id = %session.id(), "form filled");

    let cancel = session.cancellation_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let outcome = submit_first_phase(&mut session, &client).await;
    interrupt.abort();

    match outcome {
        SubmitOutcome::Completed(payload) => {
            info!(session_id = %session.id(), "first phase complete");
            println!("{}", serde_json::to_string_pretty(payload.as_value())?);
            Ok(())
        }
        SubmitOutcome::Failed(failure) => Err(anyhow!(failure.message().to_string())),
        SubmitOutcome::Refused(SubmitRefusal::Invalid(errors)) => {
            for (field, error) in errors.iter() {
                eprintln!("{field}: {error}");
            }
            Err(anyhow!("form has {} invalid fields", errors.len()))
        }
        SubmitOutcome::Refused(refusal) => Err(anyhow!(refusal.to_string())),
        SubmitOutcome::Superseded => Err(anyhow!("form changed during submission")),
        SubmitOutcome::Cancelled => Err(anyhow!("interrupted")),
    }
}
