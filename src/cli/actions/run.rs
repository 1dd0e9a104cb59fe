use crate::cli::actions::{contracts, sign_up, Action};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::SignUp(args) => sign_up::execute(args).await,
        Action::Contracts(args) => contracts::execute(args).await,
    }
}
