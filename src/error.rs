//! Error types for the Mailgun adapter.

use thiserror::Error;

/// Errors produced while constructing a [`crate::Mailgun`] adapter or sending
/// a message through it.
#[derive(Debug, Error)]
pub enum Error {
    /// The adapter could not be built from the supplied arguments.
    #[error("invalid adapter configuration: {reason}")]
    Construction {
        reason: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The message is missing a field Mailgun requires. No request was made.
    #[error("invalid message: {0}")]
    InvalidMessage(#[from] InvalidMessage),

    /// The request never produced a usable HTTP response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Mailgun answered with something other than `200 OK`.
    ///
    /// `body` holds the raw response text, usually a JSON object with a
    /// `message` field.
    #[error("email could not be sent (HTTP {status})")]
    Api { status: u16, body: String },
}

impl Error {
    pub(crate) fn construction(reason: impl Into<String>) -> Self {
        Error::Construction {
            reason: reason.into(),
            source: None,
        }
    }

    /// HTTP status code of an [`Error::Api`] rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error was raised by message validation.
    pub fn is_invalid_message(&self) -> bool {
        matches!(self, Error::InvalidMessage(_))
    }
}

/// The requirement a [`crate::Message`] failed to meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidMessage {
    #[error("sender address is empty")]
    MissingFrom,
    #[error("no recipients")]
    MissingRecipients,
    #[error("subject is empty")]
    MissingSubject,
    #[error("neither a text nor an html body is set")]
    MissingBody,
}
