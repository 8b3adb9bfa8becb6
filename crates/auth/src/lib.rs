//! Authentication and identity management.
//!
//! JWT-based bearer tokens with Argon2 password hashing. Accounts live in a
//! [`Registry`]; logins are answered by a chain of identity [`Provider`]s.
//!
//! ## Identity
//!
//! - [`Member`] — Registered user keyed by normalized email
//! - [`Registry`] — Identity store contract ([`Memory`] in-process, PostgreSQL with `database`)
//! - [`Principal`] — Who a successful login authenticated as
//!
//! ## Credentials
//!
//! - [`Credentials`] — Signup and login
//! - [`Accounts`] — Primary provider backed by the registry
//! - [`Fixture`] — Fixed development credential, never installed in production
//!
//! ## Security
//!
//! - [`Crypto`] — JWT signing and verification
//! - [`Claims`] — JWT payload structure
//! - [`Hasher`] — Argon2 hashing and verification
mod claims;
mod credentials;
mod crypto;
mod dto;
mod member;
mod password;
mod provider;
mod registry;

pub use claims::*;
pub use credentials::*;
pub use crypto::*;
pub use dto::*;
pub use member::*;
pub use password::*;
pub use provider::*;
pub use registry::*;

#[cfg(feature = "database")]
mod repository;

#[cfg(feature = "server")]
mod handlers;
#[cfg(feature = "server")]
mod middleware;
#[cfg(feature = "server")]
pub use handlers::*;
#[cfg(feature = "server")]
pub use middleware::*;
