//! Outgoing mail used by the reminder job.

use futures::future::BoxFuture;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// A plain-text email.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MailMessage {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Failure delivering a [`MailMessage`].
#[derive(Debug, Error)]
pub enum MailError {
    /// Relay could not be reached.
    #[cfg(feature = "http-mailer")]
    #[error("failed to reach mail relay `{url}`")]
    RelaySend {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// Relay answered with a non-success status.
    #[error("mail relay rejected message for `{to}` with status {status}")]
    Rejected { to: String, status: u16 },
}

/// Delivery backend for [`MailMessage`]s.
pub trait Mailer: Send + Sync {
    /// Deliver one message.
    fn send(&self, message: MailMessage) -> BoxFuture<'static, Result<(), MailError>>;
}

/// Mailer writing every message to the log instead of delivering it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, message: MailMessage) -> BoxFuture<'static, Result<(), MailError>> {
        Box::pin(async move {
            info!(
                from = %message.from,
                to = %message.to,
                subject = %message.subject,
                body = %message.body,
                "mail delivery disabled; logging message"
            );
            Ok(())
        })
    }
}

#[cfg(feature = "http-mailer")]
pub use self::http::HttpMailer;

#[cfg(feature = "http-mailer")]
mod http {
    use std::sync::Arc;

    use futures::future::BoxFuture;
    use reqwest::Client;
    use tracing::debug;

    use super::{MailError, MailMessage, Mailer};

    /// Mailer posting each message as JSON to an HTTP relay.
    #[derive(Clone)]
    pub struct HttpMailer {
        client: Client,
        relay_url: Arc<str>,
    }

    impl HttpMailer {
        /// Relay posting each message as JSON to `relay_url`.
        pub fn new(relay_url: impl Into<String>) -> Self {
            Self {
                client: Client::new(),
                relay_url: Arc::from(relay_url.into()),
            }
        }
    }

    impl Mailer for HttpMailer {
        fn send(&self, message: MailMessage) -> BoxFuture<'static, Result<(), MailError>> {
            let client = self.client.clone();
            let url = self.relay_url.clone();
            Box::pin(async move {
                let response = client
                    .post(url.as_ref())
                    .json(&message)
                    .send()
                    .await
                    .map_err(|source| MailError::RelaySend {
                        url: url.to_string(),
                        source,
                    })?;

                let status = response.status();
                if !status.is_success() {
                    return Err(MailError::Rejected {
                        to: message.to,
                        status: status.as_u16(),
                    });
                }

                debug!(to = %message.to, "mail relayed");
                Ok(())
            })
        }
    }
}
