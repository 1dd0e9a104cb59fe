use crate::registration::fields::Carrier;
use clap::{builder::ValueParser, Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const COMMAND: &str = "sign-up";
pub const ARG_NAME: &str = "name";
pub const ARG_BIRTH_DATE: &str = "birth-date";
pub const ARG_NATIONAL_ID_TAIL: &str = "national-id-tail";
pub const ARG_CARRIER: &str = "carrier";
pub const ARG_PHONE: &str = "phone";
pub const ARG_LOGIN_ID: &str = "login-id";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_EMAIL: &str = "email";

/// Raw form values; sanitizing and validation happen in the session.
#[derive(Debug, Clone)]
pub struct Options {
    pub full_name: String,
    pub birth_date: String,
    pub national_id_tail: SecretString,
    pub carrier: Carrier,
    pub phone_number: String,
    pub login_id: String,
    pub password: SecretString,
    pub email: String,
}

impl Options {
    /// Missing values are read as empty so the validation engine reports them.
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        let read = |id: &str| -> String { matches.get_one::<String>(id).cloned().unwrap_or_default() };

        Self {
            full_name: read(ARG_NAME),
            birth_date: read(ARG_BIRTH_DATE),
            national_id_tail: SecretString::from(read(ARG_NATIONAL_ID_TAIL)),
            carrier: matches
                .get_one::<Carrier>(ARG_CARRIER)
                .copied()
                .unwrap_or_default(),
            phone_number: read(ARG_PHONE),
            login_id: read(ARG_LOGIN_ID),
            password: SecretString::from(read(ARG_PASSWORD)),
            email: read(ARG_EMAIL),
        }
    }
}

#[must_use]
pub fn validator_carrier() -> ValueParser {
    ValueParser::from(move |value: &str| -> std::result::Result<Carrier, String> {
        value.parse::<Carrier>().map_err(|err| {
            format!("{err} (expected skt, kt, lgu, mvno-skt, mvno-kt, mvno-lgu or 0-5)")
        })
    })
}

#[must_use]
pub fn command() -> Command {
    Command::new(COMMAND)
        .about("Submit phase-one registration and print the second-phase payload")
        .arg(
            Arg::new(ARG_NAME)
                .long(ARG_NAME)
                .help("Full name")
                .env("MYIBO_NAME"),
        )
        .arg(
            Arg::new(ARG_BIRTH_DATE)
                .long(ARG_BIRTH_DATE)
                .help("First 6 digits of the resident registration number (YYMMDD)")
                .env("MYIBO_BIRTH_DATE"),
        )
        .arg(
            Arg::new(ARG_NATIONAL_ID_TAIL)
                .long(ARG_NATIONAL_ID_TAIL)
                .help("Last 7 digits of the resident registration number")
                .env("MYIBO_NATIONAL_ID_TAIL")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_CARRIER)
                .long(ARG_CARRIER)
                .help("Mobile carrier")
                .env("MYIBO_CARRIER")
                .default_value("skt")
                .value_parser(validator_carrier()),
        )
        .arg(
            Arg::new(ARG_PHONE)
                .long(ARG_PHONE)
                .help("11-digit phone number")
                .env("MYIBO_PHONE"),
        )
        .arg(
            Arg::new(ARG_LOGIN_ID)
                .long(ARG_LOGIN_ID)
                .help("Login ID: a letter followed by 5 to 11 letters or digits")
                .env("MYIBO_LOGIN_ID"),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .long(ARG_PASSWORD)
                .help("Password: 9 to 20 characters with letters, digits and symbols")
                .env("MYIBO_PASSWORD")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_EMAIL)
                .long(ARG_EMAIL)
                .help("Email address on an allowed domain")
                .env("MYIBO_EMAIL"),
        )
}
