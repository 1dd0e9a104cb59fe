use crate::{
    api::{client::IdentityClient, contracts::ContractList},
    cli::{commands::contracts::Options, globals::GlobalArgs},
};
use anyhow::{anyhow, Result};
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub options: Options,
}

/// List the contracts linked to the bearer token.
/// # Errors
/// Returns an error if the client cannot be built or the lookup fails.
pub async fn execute(args: Args) -> Result<()> {
    let client = IdentityClient::new(args.globals.client_config()?)?;
    debug!(api_url = %client.config().api_base_url, "fetching contracts");

    let list = ContractList::load(&client, &args.options.token).await;

    match list {
        ContractList::Failed(message) => Err(anyhow!(message)),
        list => {
            for line in list.render() {
                println!("{line}");
            }
            Ok(())
        }
    }
}
