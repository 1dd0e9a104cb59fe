use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const COMMAND: &str = "contracts";
pub const ARG_TOKEN: &str = "token";

#[derive(Debug, Clone)]
pub struct Options {
    pub token: SecretString,
}

impl Options {
    /// # Errors
    /// Returns an error if the bearer token is missing or blank.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let token = matches
            .get_one::<String>(ARG_TOKEN)
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_TOKEN}"))?;

        Ok(Self {
            token: SecretString::from(token),
        })
    }
}

#[must_use]
pub fn command() -> Command {
    Command::new(COMMAND)
        .about("List the insurance contracts linked to an account")
        .arg(
            Arg::new(ARG_TOKEN)
                .long(ARG_TOKEN)
                .help("Bearer token of the signed-in account")
                .env("MYIBO_TOKEN")
                .hide_env_values(true)
                .required(true),
        )
}
