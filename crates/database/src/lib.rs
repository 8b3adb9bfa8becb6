//! PostgreSQL connectivity for the identity store.
//!
//! ## Connectivity
//!
//! - [`db()`] — Establishes a database connection from a connection string
//! - [`migrate()`] — Applies a table's DDL idempotently
//!
//! ## Schema
//!
//! - [`Schema`] — Table metadata and DDL generation
//!
//! ## Table Names
//!
//! Constants for all persistent entities.
mod traits;

pub use traits::*;

use std::sync::Arc;
use tokio_postgres::Client;

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

/// Table for registered user accounts.
#[rustfmt::skip]
pub const USERS:       &str = "users";

/// Establishes a database connection.
///
/// Returns an `Arc<Client>` suitable for sharing across async tasks.
/// The connection driver is spawned onto the current tokio runtime and
/// logs if the connection is ever lost.
pub async fn db(url: &str) -> Result<Arc<Client>, PgErr> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let (client, connection) = tokio_postgres::connect(url, tls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("database connection closed: {}", e);
        }
    });
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await?;
    Ok(Arc::new(client))
}

/// Creates the table and its indices if they do not exist yet.
pub async fn migrate<S: Schema>(client: &Client) -> Result<(), PgErr> {
    log::info!("ensuring table ({})", S::name());
    client.batch_execute(S::creates()).await?;
    client.batch_execute(S::indices()).await?;
    Ok(())
}

/// True when the error is a UNIQUE constraint rejecting an insert.
pub fn is_unique_violation(e: &PgErr) -> bool {
    e.code() == Some(&tokio_postgres::error::SqlState::UNIQUE_VIOLATION)
}
