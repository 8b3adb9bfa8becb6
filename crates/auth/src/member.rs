use folio_core::ID;
use folio_core::Unique;
use std::time::SystemTime;

/// Canonical form of an email address: the registry's natural key.
pub fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registered user.
/// The password hash is a storage-only field and never part of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    id: ID<Self>,
    email: String,
    first_name: String,
    last_name: String,
    created: SystemTime,
    updated: SystemTime,
}

impl Member {
    pub fn new(id: ID<Self>, email: &str, first_name: &str, last_name: &str) -> Self {
        let now = SystemTime::now();
        Self::restore(id, email, first_name, last_name, now, now)
    }
    pub fn restore(
        id: ID<Self>,
        email: &str,
        first_name: &str,
        last_name: &str,
        created: SystemTime,
        updated: SystemTime,
    ) -> Self {
        Self {
            id,
            email: normalize(email),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            created,
            updated,
        }
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn first_name(&self) -> &str {
        &self.first_name
    }
    pub fn last_name(&self) -> &str {
        &self.last_name
    }
    pub fn created_at(&self) -> SystemTime {
        self.created
    }
    pub fn updated_at(&self) -> SystemTime {
        self.updated
    }
}

impl Unique for Member {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use folio_database::*;

    /// Schema implementation for Member (users table).
    impl Schema for Member {
        fn name() -> &'static str {
            USERS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                USERS,
                " (
                    id          UUID PRIMARY KEY,
                    email       VARCHAR(255) UNIQUE NOT NULL,
                    first_name  TEXT NOT NULL,
                    last_name   TEXT NOT NULL,
                    hashword    TEXT NOT NULL,
                    created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
                    updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email_lower ON ",
                USERS,
                " (lower(email));"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize("  A@X.com "), "a@x.com");
    }

    #[test]
    fn names_are_trimmed() {
        let member = Member::new(ID::default(), " A@x.com", "  Ada ", " Lovelace  ");
        assert_eq!(member.email(), "a@x.com");
        assert_eq!(member.first_name(), "Ada");
        assert_eq!(member.last_name(), "Lovelace");
        assert_eq!(member.created_at(), member.updated_at());
    }
}
