use super::*;
use folio_core::ID;
use folio_core::Unique;
use folio_database::*;
use std::sync::Arc;
use std::time::SystemTime;
use tokio_postgres::Client;

impl From<PgErr> for StoreError {
    fn from(e: PgErr) -> Self {
        match is_unique_violation(&e) {
            true => StoreError::Duplicate,
            false => StoreError::Backend(e.to_string()),
        }
    }
}

/// PostgreSQL-backed registry. The `users.email` UNIQUE constraint is
/// what settles concurrent signups for the same address.
#[async_trait::async_trait]
impl Registry for Arc<Client> {
    async fn lookup(&self, email: &str) -> Result<Option<(Member, String)>, StoreError> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT id, email, first_name, last_name, hashword, created_at, updated_at FROM ",
                USERS,
                " WHERE email = $1"
            ),
            &[&email],
        )
        .await
        .map_err(StoreError::from)
        .map(|opt| {
            opt.map(|row| {
                (
                    Member::restore(
                        ID::from(row.get::<_, uuid::Uuid>(0)),
                        row.get::<_, &str>(1),
                        row.get::<_, &str>(2),
                        row.get::<_, &str>(3),
                        row.get::<_, SystemTime>(5),
                        row.get::<_, SystemTime>(6),
                    ),
                    row.get::<_, String>(4),
                )
            })
        })
    }

    async fn create(&self, member: Member, hashword: String) -> Result<Member, StoreError> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                USERS,
                " (id, email, first_name, last_name, hashword, created_at, updated_at)
                  VALUES ($1, $2, $3, $4, $5, $6, $7)"
            ),
            &[
                &member.id().inner(),
                &member.email(),
                &member.first_name(),
                &member.last_name(),
                &hashword,
                &member.created_at(),
                &member.updated_at(),
            ],
        )
        .await
        .map_err(StoreError::from)
        .map(|_| member)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.execute("SELECT 1", &[])
            .await
            .map_err(StoreError::from)
            .map(|_| ())
    }
}
