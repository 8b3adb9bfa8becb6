use super::*;
use folio_core::Failure;
use folio_core::Settings;
use folio_core::Timestamp;

pub struct Crypto {
    encoding: jsonwebtoken::EncodingKey,
    decoding: jsonwebtoken::DecodingKey,
    validation: jsonwebtoken::Validation,
}

impl Crypto {
    pub fn new(secret: &[u8]) -> Self {
        // expiry is checked by hand against an explicit clock, without leeway
        let mut validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: jsonwebtoken::EncodingKey::from_secret(secret),
            decoding: jsonwebtoken::DecodingKey::from_secret(secret),
            validation,
        }
    }
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.jwt_secret.as_bytes())
    }
    pub fn encode(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), claims, &self.encoding)
    }
    pub fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
    }
    pub fn issue(&self, subject: &str) -> Result<String, Failure> {
        self.issue_at(subject, folio_core::now())
    }
    pub fn issue_at(&self, subject: &str, now: Timestamp) -> Result<String, Failure> {
        self.encode(&Claims::at(subject.to_string(), now))
            .map_err(Failure::internal)
    }
    pub fn verify(&self, token: &str) -> Result<Claims, Failure> {
        self.verify_at(token, folio_core::now())
    }
    /// Signature and expiry only. There is no revocation list to consult.
    pub fn verify_at(&self, token: &str, now: Timestamp) -> Result<Claims, Failure> {
        self.decode(token)
            .map_err(|e| {
                log::debug!("token rejected: {}", e);
                Failure::InvalidToken("Invalid token")
            })
            .and_then(|claims| match claims.expired_at(now) {
                true => Err(Failure::InvalidToken("Invalid token")),
                false => Ok(claims),
            })
    }
    pub const fn duration() -> std::time::Duration {
        folio_core::TOKEN_LIFETIME
    }
}
