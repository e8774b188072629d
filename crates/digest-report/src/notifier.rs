//! Digest delivery backends.

use async_trait::async_trait;
use chrono::NaiveDate;
use digest_core::error::NotifyError;
use digest_core::traits::{Notifier, Recipient};
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes each digest to `<outbox>/<date>-<recipient>.html`.
///
/// A mail relay can pick files up from there; reruns on the same day
/// overwrite the previous file.
#[derive(Debug, Clone)]
pub struct OutboxNotifier {
    dir: PathBuf,
    date: NaiveDate,
}

impl OutboxNotifier {
    pub fn new(dir: impl Into<PathBuf>, date: NaiveDate) -> Self {
        Self {
            dir: dir.into(),
            date,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File a recipient's digest is written to.
    pub fn path_for(&self, recipient: &Recipient) -> PathBuf {
        self.dir.join(format!(
            "{}-{}.html",
            self.date.format("%Y-%m-%d"),
            sanitize(&recipient.email)
        ))
    }
}

#[async_trait]
impl Notifier for OutboxNotifier {
    async fn deliver(
        &self,
        recipient: &Recipient,
        subject: &str,
        html: &str,
    ) -> Result<(), NotifyError> {
        recipient.validate()?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(recipient);
        tokio::fs::write(&path, html).await?;

        info!(
            recipient = %recipient.email,
            subject = %subject,
            path = %path.display(),
            bytes = html.len(),
            "Digest written to outbox"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "outbox"
    }
}

/// Only logs what would be delivered. Used for dry runs.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn deliver(
        &self,
        recipient: &Recipient,
        subject: &str,
        html: &str,
    ) -> Result<(), NotifyError> {
        recipient.validate()?;
        info!(
            recipient = %recipient.email,
            subject = %subject,
            bytes = html.len(),
            "Dry run: digest not delivered"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Lowercase the address and replace anything outside `[a-z0-9._-]` with `_`.
fn sanitize(email: &str) -> String {
    email
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("Jane.Doe+news@Example.com"), "jane.doe_news_example.com");
        assert_eq!(sanitize("../../etc/passwd@x.io"), ".._.._etc_passwd_x.io");
    }

    #[tokio::test]
    async fn test_outbox_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = OutboxNotifier::new(dir.path().join("outbox"), date());
        let recipient = Recipient::new("user@example.com");

        outbox
            .deliver(&recipient, "Daily Market Digest", "<html>digest</html>")
            .await
            .unwrap();

        let path = dir.path().join("outbox/2024-03-01-user_example.com.html");
        assert_eq!(outbox.path_for(&recipient), path);
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<html>digest</html>");
    }

    #[tokio::test]
    async fn test_invalid_recipient_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = OutboxNotifier::new(dir.path(), date());

        let err = outbox
            .deliver(&Recipient::new("nobody"), "subject", "<html></html>")
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::InvalidRecipient(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        let err = LogNotifier::new()
            .deliver(&Recipient::new("nobody"), "subject", "")
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::InvalidRecipient(_)));
    }

    #[tokio::test]
    async fn test_log_notifier_accepts_valid_recipient() {
        assert!(LogNotifier::new()
            .deliver(&Recipient::new("user@example.com"), "subject", "<html></html>")
            .await
            .is_ok());
    }
}
