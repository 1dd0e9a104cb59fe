//! Client side of the identity service HTTP API.
//!
//! - `POST /auth/sign-up`: phase-one registration, no authentication header.
//! - `GET /api/v1/contract`: linked contracts, `Authorization: Bearer <token>`.
//!
//! Errors carry the server's `message` when the body has one so callers can
//! surface the most specific text available.

pub mod client;
pub mod config;
pub mod contracts;
pub mod error;
pub mod types;

pub use client::IdentityClient;
pub use config::ClientConfig;
pub use contracts::ContractList;
pub use error::ApiError;
