//! Outbound message model and its Mailgun form encoding.

use crate::error::InvalidMessage;
use serde::{Deserialize, Serialize};

/// A provider-agnostic outbound email.
///
/// The adapter only reads the message; validation works on a normalized
/// copy, so the caller's value is never modified.
///
/// ```
/// use mailgun_adapter::Message;
///
/// let message = Message::new("no-reply@example.com", "Welcome")
///     .with_to("user@example.net")
///     .with_text("Thanks for signing up.");
/// assert_eq!(message.to, vec!["user@example.net"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    /// Sender address.
    pub from: String,
    /// Primary recipients, in order.
    pub to: Vec<String>,
    /// Carbon-copy recipients.
    pub cc: Vec<String>,
    /// Blind carbon-copy recipients.
    pub bcc: Vec<String>,
    /// Sent as the `Reply-To` header when set.
    pub reply_to: Option<String>,
    pub subject: String,
    /// Plain text body.
    pub text_body: Option<String>,
    /// HTML body.
    pub html_body: Option<String>,
}

impl Message {
    /// Start a message with a sender and subject and no recipients or body.
    pub fn new(from: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            subject: subject.into(),
            ..Self::default()
        }
    }

    /// Append a primary recipient.
    pub fn with_to(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    /// Append a carbon-copy recipient.
    pub fn with_cc(mut self, address: impl Into<String>) -> Self {
        self.cc.push(address.into());
        self
    }

    /// Append a blind carbon-copy recipient.
    pub fn with_bcc(mut self, address: impl Into<String>) -> Self {
        self.bcc.push(address.into());
        self
    }

    /// Set the `Reply-To` address.
    pub fn with_reply_to(mut self, address: impl Into<String>) -> Self {
        self.reply_to = Some(address.into());
        self
    }

    /// Set the plain text body.
    pub fn with_text(mut self, body: impl Into<String>) -> Self {
        self.text_body = Some(body.into());
        self
    }

    /// Set the HTML body.
    pub fn with_html(mut self, body: impl Into<String>) -> Self {
        self.html_body = Some(body.into());
        self
    }

    /// Check the fields Mailgun requires and build the ordered form fields
    /// for a `/messages` request.
    pub(crate) fn form_fields(
        &self,
        test_mode: bool,
    ) -> Result<Vec<(&'static str, String)>, InvalidMessage> {
        let normalized = Normalized::from_message(self)?;
        Ok(normalized.into_fields(test_mode))
    }
}

/// Validated view of a [`Message`], with empty optional strings collapsed to
/// `None`. Address lists are kept exactly as given.
#[derive(Debug)]
struct Normalized<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    cc: Vec<&'a str>,
    bcc: Vec<&'a str>,
    reply_to: Option<&'a str>,
    subject: &'a str,
    text: Option<&'a str>,
    html: Option<&'a str>,
}

impl<'a> Normalized<'a> {
    fn from_message(message: &'a Message) -> Result<Self, InvalidMessage> {
        let to = addresses(&message.to);
        let text = non_empty(message.text_body.as_deref());
        let html = non_empty(message.html_body.as_deref());

        // mailgun answers 400 when any of these are missing
        if message.from.is_empty() {
            return Err(InvalidMessage::MissingFrom);
        }
        if to.is_empty() {
            return Err(InvalidMessage::MissingRecipients);
        }
        if message.subject.is_empty() {
            return Err(InvalidMessage::MissingSubject);
        }
        if text.is_none() && html.is_none() {
            return Err(InvalidMessage::MissingBody);
        }

        Ok(Self {
            from: &message.from,
            to,
            cc: addresses(&message.cc),
            bcc: addresses(&message.bcc),
            reply_to: non_empty(message.reply_to.as_deref()),
            subject: &message.subject,
            text,
            html,
        })
    }

    fn into_fields(self, test_mode: bool) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("from", self.from.to_string()),
            ("to", self.to.join(",")),
            ("subject", self.subject.to_string()),
        ];

        if let Some(reply_to) = self.reply_to {
            fields.push(("h:Reply-To", reply_to.to_string()));
        }
        if !self.cc.is_empty() {
            fields.push(("cc", self.cc.join(",")));
        }
        if !self.bcc.is_empty() {
            fields.push(("bcc", self.bcc.join(",")));
        }
        if let Some(text) = self.text {
            fields.push(("text", text.to_string()));
        }
        if let Some(html) = self.html {
            fields.push(("html", html.to_string()));
        }

        fields.push(("o:testmode", test_mode.to_string()));
        fields
    }
}

fn addresses(list: &[String]) -> Vec<&str> {
    list.iter().map(String::as_str).collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
