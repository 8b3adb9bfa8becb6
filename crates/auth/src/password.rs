use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::PasswordHash;
use argon2::PasswordHasher;
use argon2::PasswordVerifier;
use argon2::Version;
use argon2::password_hash::SaltString;
use folio_core::Failure;
use folio_core::Settings;
use std::sync::Arc;

fn salt() -> Result<SaltString, argon2::password_hash::Error> {
    use rand::Rng;
    let ref mut bytes = [0u8; 16];
    rand::rng().fill(bytes);
    SaltString::encode_b64(bytes)
}

/// Argon2id hasher with tunable cost.
///
/// Stored hashes are PHC strings, so verification always uses the
/// parameters a hash was created with, even after the cost changes.
#[derive(Clone)]
pub struct Hasher {
    params: Params,
    decoy: Arc<str>,
}

impl Hasher {
    pub fn new(cost: u32, memory_kib: u32) -> Result<Self, Failure> {
        let params = Params::new(memory_kib, cost, Params::DEFAULT_P_COST, None)
            .map_err(Failure::internal)?;
        let mut hasher = Self {
            params,
            decoy: Arc::from(""),
        };
        hasher.decoy = Arc::from(hasher.hash("decoy").map_err(Failure::internal)?);
        Ok(hasher)
    }
    pub fn from_settings(settings: &Settings) -> Result<Self, Failure> {
        Self::new(settings.password_cost, settings.password_memory_kib)
    }

    fn argon(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, password: &str) -> Result<String, argon2::password_hash::Error> {
        self.argon()
            .hash_password(password.as_bytes(), &salt()?)
            .map(|h| h.to_string())
    }

    pub fn verify(&self, password: &str, hashword: &str) -> bool {
        PasswordHash::new(hashword)
            .ok()
            .as_ref()
            .map(|hash| {
                self.argon()
                    .verify_password(password.as_bytes(), hash)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// A valid hash of nothing anyone knows, for equalizing miss timing.
    pub fn decoy(&self) -> &str {
        &self.decoy
    }

    /// [`Hasher::hash`] on the blocking pool.
    pub async fn digest(&self, password: &str) -> Result<String, Failure> {
        let hasher = self.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(Failure::internal)?
            .map_err(Failure::internal)
    }

    /// [`Hasher::verify`] on the blocking pool.
    pub async fn check(&self, password: &str, hashword: &str) -> Result<bool, Failure> {
        let hasher = self.clone();
        let password = password.to_owned();
        let hashword = hashword.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hashword))
            .await
            .map_err(Failure::internal)
    }
}
