//! Digest rendering, delivery and logging setup.

mod html;
mod logging;
mod notifier;

pub use html::{render_digest, DigestContext, DigestEntry, SkippedAsset};
pub use logging::{setup_logging, LOG_FILE_PREFIX};
pub use notifier::{LogNotifier, OutboxNotifier};
