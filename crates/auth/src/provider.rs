use super::*;
use folio_core::FIXTURE_SUBJECT;
use folio_core::Failure;
use folio_core::Settings;
use folio_core::Subject;
use folio_core::Unique;
use std::sync::Arc;

/// Who a successful login authenticated as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    subject: Subject,
    fixture: bool,
}

impl Principal {
    pub fn subject(&self) -> &str {
        &self.subject
    }
    /// True when the development fixture, not a real account, answered.
    pub fn fixture(&self) -> bool {
        self.fixture
    }
}

impl From<&Member> for Principal {
    fn from(member: &Member) -> Self {
        Self {
            subject: member.id().to_string(),
            fixture: false,
        }
    }
}

/// A source of identities that can vouch for an email/password pair.
///
/// `Ok(None)` means "not mine, ask the next provider". Providers never
/// say *why* they declined.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    async fn authenticate(&self, email: &str, password: &str)
    -> Result<Option<Principal>, Failure>;
}

/// Primary provider: accounts created through signup.
pub struct Accounts {
    registry: Arc<dyn Registry>,
    hasher: Hasher,
}

impl Accounts {
    pub fn new(registry: Arc<dyn Registry>, hasher: Hasher) -> Self {
        Self { registry, hasher }
    }
}

#[async_trait::async_trait]
impl Provider for Accounts {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Principal>, Failure> {
        match self.registry.lookup(&normalize(email)).await? {
            Some((member, hashword)) => Ok(self
                .hasher
                .check(password, &hashword)
                .await?
                .then(|| Principal::from(&member))),
            None => {
                // burn the same work as a real comparison
                self.hasher.check(password, self.hasher.decoy()).await?;
                Ok(None)
            }
        }
    }
}

/// Fixed development credential. Only ever installed when the
/// environment is development; see [`Fixture::from_settings`].
pub struct Fixture {
    email: String,
    password: String,
}

impl Fixture {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: normalize(email),
            password: password.to_string(),
        }
    }
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        settings
            .development()
            .then(|| Self::new(&settings.fixture_email, &settings.fixture_password))
    }
    pub fn email(&self) -> &str {
        &self.email
    }
}

#[async_trait::async_trait]
impl Provider for Fixture {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Principal>, Failure> {
        Ok((normalize(email) == self.email && password == self.password).then(|| Principal {
            subject: FIXTURE_SUBJECT.to_string(),
            fixture: true,
        }))
    }
}
