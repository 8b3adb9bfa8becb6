use super::*;
use actix_web::HttpResponse;
use actix_web::web;
use folio_core::Failure;

pub async fn signup(
    credentials: web::Data<Credentials>,
    req: web::Json<SignupRequest>,
) -> Result<HttpResponse, Failure> {
    credentials
        .signup(&req)
        .await
        .map(|_| HttpResponse::Created().json(MessageResponse::new("User created successfully")))
}

pub async fn login(
    credentials: web::Data<Credentials>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, Failure> {
    credentials
        .login(&req)
        .await
        .map(LoginResponse::from)
        .map(|response| HttpResponse::Ok().json(response))
}
