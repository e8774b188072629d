//! Notification delivery trait definitions.

use crate::error::NotifyError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Who a digest is delivered to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    /// Topics the subscriber asked for, echoed in the digest header
    #[serde(default)]
    pub topics: Vec<String>,
}

impl Recipient {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            topics: Vec::new(),
        }
    }

    /// Reject addresses that cannot possibly be delivered to.
    pub fn validate(&self) -> Result<(), NotifyError> {
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
            _ => Err(NotifyError::InvalidRecipient(self.email.clone())),
        }
    }
}

/// Delivery backend for rendered digests.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one rendered HTML digest.
    async fn deliver(
        &self,
        recipient: &Recipient,
        subject: &str,
        html: &str,
    ) -> Result<(), NotifyError>;

    /// Get the notifier name.
    fn name(&self) -> &str;
}
