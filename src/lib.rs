//! # Myibo (Identity Verification & Phased Signup)
//!
//! `myibo` is the client-side core of a personal-insurance signup. It collects
//! personally identifying fields, validates them locally, submits them to the
//! remote identity service and tracks the two-phase registration.
//!
//! ## Signup Flow
//!
//! 1. **Edit:** Raw input passes through the field sanitizer (whitespace is
//!    stripped, over-long digit codes are rejected) into the session's draft.
//!    The validation error set is recomputed after every accepted change.
//! 2. **Phase one:** A valid draft is posted once to `/auth/sign-up`. The
//!    server answers with the "two-way info" needed for the second factor.
//! 3. **Phase two:** Out of scope here. The session only exposes the payload
//!    and the `FirstPhaseComplete` state for the caller to route on.
//!
//! ## Contracts
//!
//! Signed-in users can list their linked insurance contracts via
//! `/api/v1/contract` with a bearer token.
//!
//! The national ID tail, the password and bearer tokens are held as
//! `SecretString` and must never be logged.

pub mod api;
pub mod cli;
pub mod registration;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
