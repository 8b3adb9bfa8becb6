//! Core types, constants, and runtime utilities for the folio gateway.
//!
//! This crate provides the foundational types shared by every other crate
//! in the workspace: typed identifiers, the request failure taxonomy, and
//! the process-wide [`Settings`].
#![allow(dead_code)]

mod failure;
mod settings;

pub use failure::*;
pub use settings::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Seconds since the Unix epoch, as carried in token claims.
pub type Timestamp = i64;
/// Opaque subject identifier bound into a bearer token.
pub type Subject = String;

// ============================================================================
// TRAITS
// ============================================================================
/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
}

impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}
impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}
impl<T> TryFrom<&str> for ID<T> {
    type Error = uuid::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        uuid::Uuid::parse_str(s).map(Self::from)
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self {
            inner: uuid::Uuid::now_v7(),
            marker: PhantomData,
        }
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

// ============================================================================
// TOKEN PARAMETERS
// ============================================================================
/// Validity window of an issued bearer token.
pub const TOKEN_LIFETIME: std::time::Duration = std::time::Duration::from_secs(60 * 60);
/// Subject bound into tokens minted by the development fixture provider.
pub const FIXTURE_SUBJECT: &str = "dev-user";
/// Default fixture credential (development only).
pub const FIXTURE_EMAIL: &str = "admin@test.com";
/// Default fixture password (development only).
pub const FIXTURE_PASSWORD: &str = "123456";

// ============================================================================
// PASSWORD HASHING
// Argon2id parameters; only iterations and memory are exposed as settings.
// ============================================================================
/// Argon2 iteration count (t_cost).
pub const PASSWORD_COST: u32 = 3;
/// Argon2 memory in KiB (m_cost).
pub const PASSWORD_MEMORY_KIB: u32 = 19 * 1024;

// ============================================================================
// DOWNSTREAM PROCESSOR
// ============================================================================
/// Fallback base address of the document-processing service.
pub const PROCESSOR_URL: &str = "http://localhost:8000";
/// Upper bound on a relayed upload (processing is slow).
pub const UPLOAD_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(180);
/// Upper bound on a relayed chat message.
pub const CHAT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(90);
/// `edit_mode` sent downstream when the caller leaves it unset.
pub const EDIT_MODE: &str = "minimal";
/// Content type assumed for an uploaded file that does not declare one.
pub const UPLOAD_CONTENT_TYPE: &str = "application/pdf";

// ============================================================================
// HTTP
// ============================================================================
/// Default listen port.
pub const PORT: u16 = 3001;
/// Default listen host.
pub const BIND_ADDR: &str = "0.0.0.0";
/// Browser origin allowed by CORS.
pub const CORS_ORIGIN: &str = "http://localhost:3000";

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Current wall-clock time in Unix seconds.
pub fn now() -> Timestamp {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as Timestamp)
        .unwrap_or_default()
}

/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    let file = std::fs::create_dir_all("logs")
        .and_then(|_| std::fs::File::create(format!("logs/{}.log", now())))
        .map(|file| simplelog::WriteLogger::new(log::LevelFilter::Debug, config, file));
    let mut loggers: Vec<Box<dyn simplelog::SharedLogger>> = vec![term];
    match file {
        Ok(file) => loggers.push(file),
        Err(e) => eprintln!("file logging disabled: {}", e),
    }
    if let Err(e) = simplelog::CombinedLogger::init(loggers) {
        eprintln!("logger already initialized: {}", e);
    }
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
#[cfg(feature = "server")]
pub fn kys() {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!();
            log::warn!("interrupt received, exiting immediately");
            std::process::exit(0);
        }
    });
}
