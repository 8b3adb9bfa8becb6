//! Folio Gateway Server
//!
//! Account signup and login in front of a relay to the
//! document-processing service, served by actix-web.
//!
//! ## Routes
//!
//! - `GET /test`, `GET /health` — liveness and store reachability
//! - `POST /api/signup`, `POST /api/login` — [`folio_auth`] handlers
//! - `POST /api/upload`, `POST /api/chat` — [`folio_proxy`] handlers
//!
//! Which routes need a bearer token is decided by the [`Policy`] table.
mod policy;

pub use policy::*;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::middleware::from_fn;
use actix_web::web;
use anyhow::Context;
use folio_auth::Credentials;
use folio_auth::Crypto;
use folio_auth::Member;
use folio_auth::MessageResponse;
use folio_auth::Registry;
use folio_core::Failure;
use folio_core::Settings;
use folio_proxy::Relay;
use std::sync::Arc;

async fn greeting() -> impl Responder {
    HttpResponse::Ok().json(MessageResponse::new("Hello! Server is working!"))
}

async fn health(credentials: web::Data<Credentials>) -> impl Responder {
    match credentials
        .registry()
        .ping()
        .await
        .inspect_err(|e| log::error!("health check failed: {}", e))
    {
        Ok(_) => HttpResponse::Ok().body("ok"),
        Err(_) => HttpResponse::ServiceUnavailable().body("database unavailable"),
    }
}

/// Shared services, built once and cloned into every worker.
#[derive(Clone)]
pub struct Gateway {
    crypto: web::Data<Crypto>,
    credentials: web::Data<Credentials>,
    relay: web::Data<Relay>,
    policy: web::Data<Policy>,
}

impl Gateway {
    pub fn new(settings: &Settings, registry: Arc<dyn Registry>) -> Result<Self, Failure> {
        let crypto = Arc::new(Crypto::from_settings(settings));
        let credentials = Credentials::from_settings(settings, registry, crypto.clone())?;
        Ok(Self {
            crypto: web::Data::from(crypto),
            credentials: web::Data::new(credentials),
            relay: web::Data::new(Relay::from_settings(settings)?),
            policy: web::Data::new(Policy::from_settings(settings)),
        })
    }

    #[rustfmt::skip]
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        let json = web::JsonConfig::default().error_handler(|e, _| {
            log::debug!("unreadable json body: {}", e);
            Failure::Validation("Invalid JSON body").into()
        });
        cfg.app_data(json)
            .app_data(self.crypto.clone())
            .app_data(self.credentials.clone())
            .app_data(self.relay.clone())
            .app_data(self.policy.clone())
            .service(
                web::scope("")
                    .wrap(from_fn(gate))
                    .route("/test",       web::get().to(greeting))
                    .route("/health",     web::get().to(health))
                    .route("/api/signup", web::post().to(folio_auth::signup))
                    .route("/api/login",  web::post().to(folio_auth::login))
                    .route("/api/upload", web::post().to(folio_proxy::upload))
                    .route("/api/chat",   web::post().to(folio_proxy::chat)),
            );
    }
}

/// Connects the store, ensures the schema, and serves until shutdown.
#[rustfmt::skip]
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let client = folio_database::db(&settings.database_url)
        .await
        .context("connecting to database")?;
    folio_database::migrate::<Member>(&client)
        .await
        .context("creating users table")?;
    let gateway = Gateway::new(&settings, Arc::new(client)).context("building services")?;
    let origin = settings.cors_origin.clone();
    let (host, port) = settings.listen();
    log::info!("starting gateway on {}:{} → {}", host, port, settings.processor_url);
    let server = HttpServer::new(move || {
        let gateway = gateway.clone();
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allowed_origin(&origin)
                    .allow_any_method()
                    .allow_any_header()
                    .supports_credentials(),
            )
            .configure(move |cfg| gateway.configure(cfg))
    });
    let server = match settings.workers {
        Some(workers) => server.workers(workers),
        None => server,
    };
    server
        .bind((host.as_str(), port))
        .with_context(|| format!("binding {}:{}", host, port))?
        .run()
        .await
        .context("serving")
}
