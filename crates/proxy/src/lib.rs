//! Relay to the document-processing service.
//!
//! - [`Relay`] — Outbound client with per-operation timeouts and cancellation
//! - [`Upload`] / [`Attachment`] — A file plus its editing mode, bound for `/upload`
//! - [`Chat`] — A conversational turn, bound for `/chat`
//!
//! With `server`, the actix handlers for `/api/upload` and `/api/chat`.
mod relay;
mod request;

pub use relay::*;
pub use request::*;

#[cfg(feature = "server")]
mod handlers;
#[cfg(feature = "server")]
mod multipart;
#[cfg(feature = "server")]
pub use handlers::*;
