//! Folio Gateway Binary
//!
//! Signup, login, and the processing relay on BIND_ADDR:PORT.
//! Reads a `.env` file when present, then the process environment.
//! Refuses to start without DB_URL and JWT_SECRET.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    folio_core::log();
    folio_core::kys();
    dotenvy::dotenv().ok();
    let settings = folio_core::Settings::from_env()?;
    if settings.development() {
        log::warn!("running in development mode");
    }
    folio_server::run(settings).await
}
