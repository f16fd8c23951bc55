//! # Mailgun Adapter
//! Asynchronous adapter that turns a provider-agnostic [`Message`] into a request against the Mailgun messages HTTP API and reports whether Mailgun accepted it, using [`Mailgun`] and [`MailgunBuilder`].
//!
//! ## Audience and uses
//! For Rust applications that already model outgoing email and want to hand it to Mailgun: build an adapter once with the sending domain and API key, then call [`Mailgun::send`] for every message, from as many tasks as you like.
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. HTTP calls use `reqwest`. Diagnostics are emitted through `tracing`; install a subscriber in your application to see them.
//!
//! ## Out of scope
//! Attachments, retries, rate limiting, bulk sending, templates, webhooks, and the rest of the Mailgun API (validation, stats, suppressions) are not covered. Each send is exactly one request.
//!
//! ## Errors
//! Construction problems surface as [`Error::Construction`]. Messages missing a sender, recipients, subject or body fail with [`Error::InvalidMessage`] before any request is made. Connection failures become [`Error::Transport`], and any non-200 answer becomes [`Error::Api`] with the status and raw body. The crate-wide [`Result`] alias wraps these errors.
//!
//! ## Example
//! ```no_run
//! use mailgun_adapter::{Mailgun, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mailgun_adapter::Error> {
//!     let mailgun = Mailgun::builder("example.com", "key-123")
//!         .test_mode(false)
//!         .build()?;
//!
//!     let message = Message::new("no-reply@example.com", "Welcome")
//!         .with_to("user@example.net")
//!         .with_text("Thanks for signing up.")
//!         .with_html("<p>Thanks for signing up.</p>");
//!
//!     mailgun.send(&message).await?;
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod models;

pub use client::{Config, Mailgun, MailgunBuilder};
pub use error::{Error, InvalidMessage};
pub use models::Message;

/// Result type alias for Mailgun adapter operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
