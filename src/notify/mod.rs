mod telegram;
mod webhook;

pub use telegram::TelegramGateway;
pub use webhook::WebhookGateway;

use std::time::Duration;
use thiserror::Error;

use crate::config::NotificationConfig;
use crate::monitoring::{Alert, Channel};

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("failed to send notification: {0}")]
    Network(String),
    #[error("notification endpoint returned status {0}")]
    Status(u16),
    #[error("invalid destination `{0}`")]
    InvalidDestination(String),
}

/// Capability to deliver a free-text message to a destination
#[allow(async_fn_in_trait)]
pub trait NotificationGateway {
    async fn send(&self, destination: &str, message: &str) -> Result<(), NotificationError>;
}

/// Gateway selected from configuration
#[derive(Debug, Clone)]
pub enum Gateway {
    Webhook(WebhookGateway),
    Telegram(TelegramGateway),
}

impl Gateway {
    pub fn from_config(config: &NotificationConfig, timeout: Duration) -> Result<Self, NotificationError> {
        match &config.telegram {
            Some(telegram) => Ok(Self::Telegram(TelegramGateway::new(telegram))),
            None => Ok(Self::Webhook(WebhookGateway::new(timeout)?)),
        }
    }
}

impl NotificationGateway for Gateway {
    async fn send(&self, destination: &str, message: &str) -> Result<(), NotificationError> {
        match self {
            Gateway::Webhook(gateway) => gateway.send(destination, message).await,
            Gateway::Telegram(gateway) => gateway.send(destination, message).await,
        }
    }
}

/// Routes alerts to their channel's destination. Delivery failures are
/// logged and never retried.
#[derive(Debug, Clone)]
pub struct AlertRouter<G> {
    gateway: G,
    balance_destination: String,
    rpc_destination: String,
}

impl<G: NotificationGateway> AlertRouter<G> {
    pub fn new(gateway: G, config: &NotificationConfig) -> Self {
        Self {
            gateway,
            balance_destination: config.balance_destination.clone(),
            rpc_destination: config.rpc_destination.clone(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Log the alert and attempt delivery. Returns whether it was delivered.
    pub async fn dispatch(&self, alert: &Alert) -> bool {
        tracing::warn!(network = %alert.network, wallet = %alert.address, "{}", alert.message);

        let destination = match alert.kind.channel() {
            Channel::Balance => &self.balance_destination,
            Channel::Rpc => &self.rpc_destination,
        };
        if destination.is_empty() {
            tracing::debug!(kind = ?alert.kind, "no destination configured, alert logged only");
            return false;
        }

        match self.gateway.send(destination, &alert.message).await {
            Ok(()) => {
                tracing::info!(kind = ?alert.kind, "notification sent");
                true
            }
            Err(e) => {
                tracing::error!(kind = ?alert.kind, error = %e, "notification delivery failed");
                false
            }
        }
    }
}
