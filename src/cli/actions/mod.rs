pub mod contracts;
pub mod sign_up;

// Internal "interpreter" for `Action`.
mod run;

#[derive(Debug)]
pub enum Action {
    SignUp(sign_up::Args),
    Contracts(contracts::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
