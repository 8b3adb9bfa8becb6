use super::*;
use folio_core::ID;
use folio_core::Subject;
use folio_core::TOKEN_LIFETIME;
use folio_core::Timestamp;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: Subject,
    pub iat: Timestamp,
    pub exp: Timestamp,
}

impl Claims {
    pub fn at(subject: Subject, now: Timestamp) -> Self {
        Self {
            sub: subject,
            iat: now,
            exp: now + TOKEN_LIFETIME.as_secs() as Timestamp,
        }
    }
    /// Expiry is exclusive: a token is dead at the instant `exp` is reached.
    pub fn expired_at(&self, now: Timestamp) -> bool {
        now >= self.exp
    }
    pub fn subject(&self) -> &str {
        &self.sub
    }
    /// The member this token belongs to, if the subject is a member id.
    pub fn member(&self) -> Option<ID<Member>> {
        ID::try_from(self.sub.as_str()).ok()
    }
}
