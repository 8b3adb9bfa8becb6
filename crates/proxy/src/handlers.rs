use super::*;
use actix_multipart::Multipart;
use actix_web::HttpMessage;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::web;
use folio_auth::Auth;
use folio_core::Failure;
use tokio_util::sync::CancellationToken;

/// Cancelled when the handler future is dropped, i.e. when the caller
/// goes away before the relay finishes.
fn tether() -> (CancellationToken, tokio_util::sync::DropGuard) {
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();
    (cancel, guard)
}

pub async fn upload(
    relay: web::Data<Relay>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, Failure> {
    let (cancel, _guard) = tether();
    let upload = match req.content_type().eq_ignore_ascii_case("multipart/form-data") {
        true => Upload::read(Multipart::new(req.headers(), payload)).await?,
        false => Upload::default(),
    };
    relay
        .forward_upload(upload, &cancel)
        .await
        .map(|value| HttpResponse::Ok().json(value))
}

pub async fn chat(
    relay: web::Data<Relay>,
    auth: Auth,
    req: web::Json<Chat>,
) -> Result<HttpResponse, Failure> {
    let (cancel, _guard) = tether();
    log::debug!("chat from {}", auth.subject());
    relay
        .forward_chat(&req, &cancel)
        .await
        .map(|answer| HttpResponse::Ok().json(ChatResponse { answer }))
}
