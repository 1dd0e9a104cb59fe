//! Maps validated CLI matches to an [`Action`].

use crate::cli::{
    actions::{contracts, sign_up, Action},
    commands,
    globals::GlobalArgs,
};
use anyhow::{anyhow, Result};

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or no subcommand was given.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let globals = GlobalArgs::parse(matches)?;

    match matches.subcommand() {
        Some((commands::sign_up::COMMAND, sub_m)) => Ok(Action::SignUp(sign_up::Args {
            globals,
            options: commands::sign_up::Options::parse(sub_m),
        })),
        Some((commands::contracts::COMMAND, sub_m)) => Ok(Action::Contracts(contracts::Args {
            globals,
            options: commands::contracts::Options::parse(sub_m)?,
        })),
        Some((name, _)) => Err(anyhow!("unknown subcommand: {name}")),
        None => Err(anyhow!("missing subcommand")),
    }
}
