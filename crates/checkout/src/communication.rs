//! Customer notification strategies.
//!
//! Delivery (SMTP, SMS gateways) is handled downstream. A strategy resolves
//! the recipient address for its channel and produces the notification to
//! hand off.

use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use orderly_core::CurrentUser;

/// Errors a communication strategy can return.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommunicationError {
    /// The customer has no address for this channel.
    #[error("customer has no {channel} address")]
    NoAddress {
        /// Channel name.
        channel: &'static str,
    },
    /// Unknown channel name in configuration.
    #[error("unknown communication channel: {0}")]
    UnknownChannel(String),
}

/// A notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Channel name.
    pub channel: &'static str,
    /// Resolved recipient address.
    pub recipient: String,
    /// Message body.
    pub body: String,
}

/// A channel for telling the customer about their order.
pub trait Communication: fmt::Debug + Send + Sync {
    /// Short stable name (`"email"`, `"sms"`).
    fn name(&self) -> &'static str;

    /// Prepare `message` for `recipient`.
    ///
    /// # Errors
    ///
    /// Returns `CommunicationError::NoAddress` if the recipient cannot be
    /// reached on this channel.
    fn notify(
        &self,
        recipient: &CurrentUser,
        message: &str,
    ) -> Result<Notification, CommunicationError>;
}

/// Email notification. The default channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Email;

impl Communication for Email {
    fn name(&self) -> &'static str {
        "email"
    }

    fn notify(
        &self,
        recipient: &CurrentUser,
        message: &str,
    ) -> Result<Notification, CommunicationError> {
        tracing::info!(user_id = %recipient.id, "queueing order email");
        Ok(Notification {
            channel: self.name(),
            recipient: recipient.email.to_string(),
            body: message.to_owned(),
        })
    }
}

/// SMS notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sms;

impl Communication for Sms {
    fn name(&self) -> &'static str {
        "sms"
    }

    fn notify(
        &self,
        recipient: &CurrentUser,
        message: &str,
    ) -> Result<Notification, CommunicationError> {
        let phone = recipient
            .phone
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or(CommunicationError::NoAddress {
                channel: self.name(),
            })?;
        tracing::info!(user_id = %recipient.id, "queueing order sms");
        Ok(Notification {
            channel: self.name(),
            recipient: phone.to_owned(),
            body: message.to_owned(),
        })
    }
}

/// Communication channel selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommunicationChannel {
    #[default]
    Email,
    Sms,
}

impl CommunicationChannel {
    /// Instantiate the strategy.
    #[must_use]
    pub fn strategy(self) -> Arc<dyn Communication> {
        match self {
            Self::Email => Arc::new(Email),
            Self::Sms => Arc::new(Sms),
        }
    }
}

impl FromStr for CommunicationChannel {
    type Err = CommunicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "sms" => Ok(Self::Sms),
            _ => Err(CommunicationError::UnknownChannel(s.to_owned())),
        }
    }
}
