use super::*;
use folio_core::Failure;
use folio_core::ID;
use folio_core::Settings;
use folio_core::Unique;
use std::sync::Arc;

/// A freshly minted token and who it was minted for.
#[derive(Debug, Clone)]
pub struct Grant {
    pub token: String,
    pub principal: Principal,
}

impl From<Grant> for LoginResponse {
    fn from(grant: Grant) -> Self {
        Self {
            token: grant.token,
            dev: grant.principal.fixture(),
        }
    }
}

/// Account creation and login.
pub struct Credentials {
    registry: Arc<dyn Registry>,
    hasher: Hasher,
    crypto: Arc<Crypto>,
    providers: Vec<Box<dyn Provider>>,
}

impl Credentials {
    pub fn new(registry: Arc<dyn Registry>, hasher: Hasher, crypto: Arc<Crypto>) -> Self {
        let accounts = Accounts::new(registry.clone(), hasher.clone());
        Self {
            registry,
            hasher,
            crypto,
            providers: vec![Box::new(accounts)],
        }
    }
    /// Puts the fixture ahead of real accounts.
    pub fn with_fixture(mut self, fixture: Fixture) -> Self {
        log::warn!("fixture login enabled for {}", fixture.email());
        self.providers.insert(0, Box::new(fixture));
        self
    }
    pub fn from_settings(
        settings: &Settings,
        registry: Arc<dyn Registry>,
        crypto: Arc<Crypto>,
    ) -> Result<Self, Failure> {
        let credentials = Self::new(registry, Hasher::from_settings(settings)?, crypto);
        Ok(match Fixture::from_settings(settings) {
            Some(fixture) => credentials.with_fixture(fixture),
            None => credentials,
        })
    }
    pub fn registry(&self) -> &Arc<dyn Registry> {
        &self.registry
    }

    pub async fn signup(&self, req: &SignupRequest) -> Result<Member, Failure> {
        let (email, first_name, last_name, password) = req.required()?;
        let email = normalize(email);
        log::info!("signup → {} ({} {})", email, first_name, last_name);
        if self.registry.lookup(&email).await?.is_some() {
            return Err(Failure::DuplicateAccount);
        }
        let hashword = self.hasher.digest(password).await?;
        let member = Member::new(ID::default(), &email, first_name, last_name);
        let member = self.registry.create(member, hashword).await?;
        log::info!("created member {}", member.id());
        Ok(member)
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<Grant, Failure> {
        let (email, password) = req.required()?;
        for provider in self.providers.iter() {
            if let Some(principal) = provider.authenticate(email, password).await? {
                let token = self.crypto.issue(principal.subject())?;
                log::info!("login → {}", principal.subject());
                return Ok(Grant { token, principal });
            }
        }
        log::debug!("login rejected for {}", normalize(email));
        Err(Failure::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;

    fn credentials() -> (Credentials, Arc<Memory>, Arc<Crypto>) {
        let memory = Arc::new(Memory::new());
        let crypto = Arc::new(Crypto::new(b"test-secret"));
        let hasher = Hasher::new(1, 1024).unwrap();
        let credentials = Credentials::new(memory.clone(), hasher, crypto.clone());
        (credentials, memory, crypto)
    }

    fn ada() -> SignupRequest {
        SignupRequest::new("a@x.com", "A", "B", "pw123456")
    }

    #[tokio::test]
    async fn signup_then_login_yields_verifiable_token() {
        let (credentials, _, crypto) = credentials();
        let member = credentials.signup(&ada()).await.unwrap();
        let grant = credentials
            .login(&LoginRequest::new("a@x.com", "pw123456"))
            .await
            .unwrap();
        let claims = crypto.verify(&grant.token).unwrap();
        assert_eq!(claims.member(), Some(member.id()));
        assert!(!grant.principal.fixture());
    }

    #[tokio::test]
    async fn repeat_signup_is_duplicate() {
        let (credentials, memory, _) = credentials();
        credentials.signup(&ada()).await.unwrap();
        let again = SignupRequest::new(" A@X.com", "Other", "Person", "different");
        assert!(matches!(
            credentials.signup(&again).await,
            Err(Failure::DuplicateAccount)
        ));
        assert_eq!(memory.len().await, 1);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let (credentials, _, _) = credentials();
        credentials.signup(&ada()).await.unwrap();
        let wrong = credentials
            .login(&LoginRequest::new("a@x.com", "wrong"))
            .await
            .unwrap_err();
        let unknown = credentials
            .login(&LoginRequest::new("nobody@x.com", "pw123456"))
            .await
            .unwrap_err();
        assert!(matches!(wrong, Failure::InvalidCredentials));
        assert!(matches!(unknown, Failure::InvalidCredentials));
        assert_eq!(wrong.status(), unknown.status());
        assert_eq!(wrong.body(), unknown.body());
    }

    #[tokio::test]
    async fn signup_validates_before_touching_store() {
        let (credentials, memory, _) = credentials();
        let req = SignupRequest::new("a@x.com", "", "B", "pw123456");
        assert!(matches!(
            credentials.signup(&req).await,
            Err(Failure::Validation(_))
        ));
        assert_eq!(memory.len().await, 0);
    }

    #[tokio::test]
    async fn login_requires_both_fields() {
        let (credentials, _, _) = credentials();
        let req = LoginRequest::new("a@x.com", "");
        assert!(matches!(
            credentials.login(&req).await,
            Err(Failure::Validation("Email and password required"))
        ));
    }

    #[tokio::test]
    async fn stored_hash_is_not_the_password() {
        let (credentials, memory, _) = credentials();
        credentials.signup(&ada()).await.unwrap();
        let (_, hashword) = memory.lookup("a@x.com").await.unwrap().unwrap();
        assert_ne!(hashword, "pw123456");
        assert!(hashword.starts_with("$argon2id$"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_duplicate_signups_admit_one() {
        let (credentials, memory, _) = credentials();
        let credentials = Arc::new(credentials);
        let attempts = (0..8)
            .map(|_| {
                let credentials = credentials.clone();
                tokio::spawn(async move { credentials.signup(&ada()).await })
            })
            .collect::<Vec<_>>();
        let results = join_all(attempts)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect::<Vec<_>>();
        let created = results.iter().filter(|r| r.is_ok()).count();
        let duplicates = results
            .iter()
            .filter(|r| matches!(r, Err(Failure::DuplicateAccount)))
            .count();
        assert_eq!(created, 1);
        assert_eq!(duplicates, 7);
        assert_eq!(memory.len().await, 1);
    }

    #[tokio::test]
    async fn fixture_answers_before_accounts() {
        let (credentials, _, crypto) = credentials();
        let credentials = credentials.with_fixture(Fixture::new("admin@test.com", "123456"));
        let grant = credentials
            .login(&LoginRequest::new("admin@test.com", "123456"))
            .await
            .unwrap();
        assert!(grant.principal.fixture());
        assert_eq!(crypto.verify(&grant.token).unwrap().subject(), "dev-user");
        let response = LoginResponse::from(grant);
        assert!(response.dev);
    }

    #[tokio::test]
    async fn fixture_credential_fails_without_fixture() {
        let (credentials, _, _) = credentials();
        assert!(matches!(
            credentials
                .login(&LoginRequest::new("admin@test.com", "123456"))
                .await,
            Err(Failure::InvalidCredentials)
        ));
    }
}
