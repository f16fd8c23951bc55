//! Mailgun adapter implementation.

use crate::{Error, Message, Result};
use reqwest::{StatusCode, Url, multipart::Form};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Async adapter that submits [`Message`]s to the Mailgun messages API.
///
/// The adapter is immutable once built. Every [`Mailgun::send`] call is an
/// independent request, so one instance can be cloned or shared across tasks
/// and used concurrently.
#[derive(Clone)]
pub struct Mailgun {
    http: reqwest::Client,
    domain: String,
    api_key: String,
    config: Config,
    endpoint: Url,
}

impl Mailgun {
    /// Create a builder for configuring the adapter.
    pub fn builder(domain: impl Into<String>, api_key: impl Into<String>) -> MailgunBuilder {
        MailgunBuilder::new(domain, api_key)
    }

    /// Create an adapter with the default [`Config`].
    ///
    /// # Examples
    /// ```
    /// # use mailgun_adapter::Mailgun;
    /// let mailgun = Mailgun::new("example.com", "key-123")?;
    /// assert_eq!(
    ///     mailgun.endpoint(),
    ///     "https://api.mailgun.net/v2/example.com/messages"
    /// );
    /// # Ok::<(), mailgun_adapter::Error>(())
    /// ```
    pub fn new(domain: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        MailgunBuilder::new(domain, api_key).build()
    }

    /// The sending domain registered with Mailgun.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The configuration the adapter was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Full URL that messages are posted to.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Send a message through Mailgun.
    ///
    /// The message is validated before any network activity; an invalid
    /// message yields [`Error::InvalidMessage`] without a request being made.
    /// A `200 OK` answer resolves to `Ok(())` without reading the body. Any
    /// other status yields [`Error::Api`] carrying the full response body.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailgun_adapter::{Mailgun, Message};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailgun_adapter::Error> {
    /// let mailgun = Mailgun::new("example.com", "key-123")?;
    /// let message = Message::new("no-reply@example.com", "Hello")
    ///     .with_to("user@example.net")
    ///     .with_text("Hi there");
    /// mailgun.send(&message).await?;
    /// # Ok(())
    /// # }
    /// ```
    #[tracing::instrument(skip_all, fields(domain = %self.domain))]
    pub async fn send(&self, message: &Message) -> Result<()> {
        let fields = message.form_fields(self.config.test_mode)?;

        let form = fields
            .into_iter()
            .fold(Form::new().percent_encode_noop(), |form, (name, value)| {
                form.text(name, value)
            });

        debug!(
            recipients = message.to.len(),
            test_mode = self.config.test_mode,
            "submitting message"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .basic_auth(API_USER, Some(&self.api_key))
            .multipart(form)
            .send()
            .await
            .inspect_err(|err| warn!(error = %err, "mailgun request failed"))?;

        let status = response.status();
        if status == StatusCode::OK {
            debug!("message accepted");
            return Ok(());
        }

        let body = response.text().await?;
        warn!(status = status.as_u16(), "mailgun rejected message");

        Err(Error::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// Send a message without waiting for, or reporting, the outcome.
    ///
    /// The request runs on the current Tokio runtime. Validation, transport
    /// and API failures are logged and then dropped. Returns `None` (and
    /// sends nothing) when called outside a runtime.
    pub fn send_detached(&self, message: Message) -> Option<JoinHandle<()>> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("no tokio runtime available, message dropped");
            return None;
        };

        let adapter = self.clone();
        Some(runtime.spawn(async move {
            if let Err(err) = adapter.send(&message).await {
                warn!(error = %err, "detached send failed");
            }
        }))
    }
}

impl fmt::Debug for Mailgun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailgun")
            .field("domain", &self.domain)
            .field("api_key", &"<redacted>")
            .field("config", &self.config)
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

const API_USER: &str = "api";
const API_HOST: &str = "api.mailgun.net";

/// Connection settings for the Mailgun API.
///
/// Every field has a default, so an application can deserialize a partial
/// (or empty) table from its own configuration and hand it to
/// [`MailgunBuilder::config`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ask Mailgun to accept but not deliver messages.
    pub test_mode: bool,
    /// Use HTTPS (`true`) or plain HTTP.
    pub secure: bool,
    /// Hostname of the Mailgun API.
    pub api_host: String,
    /// Explicit port; `None` or `0` picks 443 or 80 to match `secure`.
    pub api_port: Option<u16>,
}

impl Config {
    /// Port the adapter connects to.
    pub fn port(&self) -> u16 {
        match self.api_port {
            Some(port) if port != 0 => port,
            _ if self.secure => 443,
            _ => 80,
        }
    }

    fn scheme(&self) -> &'static str {
        if self.secure { "https" } else { "http" }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            test_mode: true,
            secure: true,
            api_host: API_HOST.to_string(),
            api_port: None,
        }
    }
}

/// Builder for configuring a Mailgun adapter.
///
/// Start with [`Mailgun::builder`] to override defaults.
#[derive(Debug, Clone)]
pub struct MailgunBuilder {
    domain: String,
    api_key: String,
    config: Config,
    proxy: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl MailgunBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - Test mode on
    /// - HTTPS to `api.mailgun.net` on port 443
    /// - No proxy, no request timeout, reqwest's user agent
    pub fn new(domain: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            api_key: api_key.into(),
            config: Config::default(),
            proxy: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Replace all connection settings at once.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Toggle Mailgun test mode (default: true).
    pub fn test_mode(mut self, value: bool) -> Self {
        self.config.test_mode = value;
        self
    }

    /// Choose HTTPS (default) or plain HTTP.
    pub fn secure(mut self, value: bool) -> Self {
        self.config.secure = value;
        self
    }

    /// Override the API hostname.
    ///
    /// Useful for the EU region (`api.eu.mailgun.net`) or for testing.
    pub fn api_host(mut self, host: impl Into<String>) -> Self {
        self.config.api_host = host.into();
        self
    }

    /// Override the API port (default: 443 for HTTPS, 80 for HTTP).
    pub fn api_port(mut self, port: u16) -> Self {
        self.config.api_port = Some(port);
        self
    }

    /// Set a proxy URL (e.g., "socks5://127.0.0.1:1080").
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Override the `User-Agent` header sent with every request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Fail requests that take longer than `timeout` with a transport error.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate the settings and build the adapter.
    ///
    /// Fails with [`Error::Construction`] when the domain or API key is
    /// blank, when the host and port do not form a valid URL, or when the
    /// HTTP client rejects the transport options.
    pub fn build(self) -> Result<Mailgun> {
        if self.domain.trim().is_empty() {
            return Err(Error::construction("domain is empty"));
        }
        if self.api_key.trim().is_empty() {
            return Err(Error::construction("api key is empty"));
        }

        let endpoint = messages_url(&self.config, &self.domain)?;

        let mut builder = reqwest::Client::builder();
        if let Some(proxy_url) = &self.proxy {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|err| Error::Construction {
                reason: format!("invalid proxy url {proxy_url:?}"),
                source: Some(err),
            })?;
            builder = builder.proxy(proxy);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().map_err(|err| Error::Construction {
            reason: "failed to build http client".to_string(),
            source: Some(err),
        })?;

        Ok(Mailgun {
            http,
            domain: self.domain,
            api_key: self.api_key,
            config: self.config,
            endpoint,
        })
    }
}

/// Compose `{scheme}://{host}:{port}/v2/{domain}/messages`.
fn messages_url(config: &Config, domain: &str) -> Result<Url> {
    let base = format!(
        "{}://{}:{}/",
        config.scheme(),
        config.api_host,
        config.port()
    );
    let mut url = Url::parse(&base)
        .map_err(|err| Error::construction(format!("invalid api address {base:?}: {err}")))?;

    url.path_segments_mut()
        .map_err(|_| Error::construction(format!("api address {base:?} cannot carry a path")))?
        .pop_if_empty()
        .extend(["v2", domain, "messages"]);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let mailgun = Mailgun::new("example.com", "key").unwrap();
        assert_eq!(mailgun.config(), &Config::default());
        assert!(mailgun.config().test_mode);
        assert!(mailgun.config().secure);
        assert_eq!(mailgun.config().api_host, "api.mailgun.net");
        assert_eq!(mailgun.config().port(), 443);
        assert_eq!(mailgun.domain(), "example.com");
    }

    #[test]
    fn port_follows_scheme() {
        let mailgun = Mailgun::builder("example.com", "key")
            .secure(false)
            .build()
            .unwrap();
        assert_eq!(mailgun.config().port(), 80);
        assert_eq!(
            mailgun.endpoint(),
            "http://api.mailgun.net/v2/example.com/messages"
        );
    }

    #[test]
    fn explicit_host_and_port() {
        let mailgun = Mailgun::builder("mg.example.com", "key")
            .api_host("127.0.0.1")
            .api_port(8025)
            .test_mode(false)
            .build()
            .unwrap();
        assert_eq!(
            mailgun.endpoint(),
            "https://127.0.0.1:8025/v2/mg.example.com/messages"
        );
        assert!(!mailgun.config().test_mode);
    }

    #[test]
    fn zero_port_means_scheme_default() {
        let mailgun = Mailgun::builder("example.com", "key")
            .secure(false)
            .api_port(0)
            .build()
            .unwrap();
        assert_eq!(mailgun.config().port(), 80);
        assert_eq!(
            mailgun.endpoint(),
            "http://api.mailgun.net/v2/example.com/messages"
        );

        let config: Config = serde_json::from_str(r#"{"api_port":0}"#).unwrap();
        assert_eq!(config.port(), 443);
    }

    #[test]
    fn blank_credentials_fail() {
        for (domain, key) in [("", "key"), ("example.com", ""), ("  ", "key")] {
            let err = Mailgun::new(domain, key).unwrap_err();
            assert!(matches!(err, Error::Construction { .. }), "{err:?}");
        }
    }

    #[test]
    fn bad_host_fails() {
        let err = Mailgun::builder("example.com", "key")
            .api_host("")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Construction { .. }));
    }

    #[test]
    fn bad_proxy_fails() {
        let err = Mailgun::builder("example.com", "key")
            .proxy("not a proxy url")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Construction {
                source: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn empty_config_takes_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());

        let config: Config =
            serde_json::from_str(r#"{"secure":false,"api_port":8080}"#).unwrap();
        assert!(config.test_mode);
        assert_eq!(config.port(), 8080);
        assert_eq!(config.scheme(), "http");
    }

    #[test]
    fn debug_redacts_api_key() {
        let mailgun = Mailgun::new("example.com", "key-secret").unwrap();
        let printed = format!("{mailgun:?}");
        assert!(!printed.contains("key-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
