use super::*;
use actix_web::FromRequest;
use actix_web::HttpMessage;
use actix_web::HttpRequest;
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::web;
use folio_core::Failure;
use std::future::Ready;
use std::future::ready;

/// Checks an `Authorization` header value against `crypto`.
/// Anything other than `Bearer <token>` counts as no token at all.
pub fn authenticate(crypto: &Crypto, header: Option<&str>) -> Result<Claims, Failure> {
    header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(Failure::InvalidToken("No token"))
        .and_then(|token| crypto.verify(token))
}

/// The raw `Authorization` header value, scheme included.
pub fn authorization(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
}

/// Extractor for authenticated requests.
///
/// Claims already attached by an upstream gate are reused; otherwise the
/// header is verified here.
pub struct Auth(pub Claims);

impl Auth {
    pub fn subject(&self) -> &str {
        self.0.subject()
    }
}

impl FromRequest for Auth {
    type Error = Failure;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(claims) = req.extensions().get::<Claims>().cloned() {
            return ready(Ok(Auth(claims)));
        }
        ready(
            req.app_data::<web::Data<Crypto>>()
                .ok_or_else(|| Failure::internal("token service not configured"))
                .and_then(|crypto| authenticate(crypto, authorization(req)))
                .map(Auth),
        )
    }
}
