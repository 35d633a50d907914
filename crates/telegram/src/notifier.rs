//! Best-effort notification delivery.
//!
//! A failed notification must never fail the operation that triggered it.
//! [`dispatch`] runs the send on its own task and only logs the outcome.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::client::{BotClient, SendMessage, TelegramError};

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error(transparent)]
    Telegram(#[from] TelegramError),
}

/// Something that can deliver a short HTML text to a chat.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, destination: &str, text: &str) -> Result<(), NotifyError>;
}

#[async_trait]
impl Notifier for BotClient {
    async fn send(&self, destination: &str, text: &str) -> Result<(), NotifyError> {
        self.send_message(&SendMessage::html(destination, text))
            .await?;
        Ok(())
    }
}

/// Used when no bot token is configured: drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send(&self, destination: &str, _text: &str) -> Result<(), NotifyError> {
        tracing::debug!(destination, "Telegram not configured, notification dropped");
        Ok(())
    }
}

/// Fire-and-forget send. Errors are logged at `warn` and swallowed.
///
/// The returned handle is only useful to tests; callers may drop it.
pub fn dispatch(notifier: Arc<dyn Notifier>, destination: String, text: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        match notifier.send(&destination, &text).await {
            Ok(()) => tracing::debug!(destination = %destination, "Notification delivered"),
            Err(e) => tracing::warn!(
                destination = %destination,
                error = %e,
                "Notification delivery failed"
            ),
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct FailingNotifier {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn send(&self, _destination: &str, _text: &str) -> Result<(), NotifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(NotifyError::Telegram(TelegramError::Api {
                code: 403,
                description: "bot was kicked".into(),
            }))
        }
    }

    #[tokio::test]
    async fn dispatch_swallows_errors() {
        let notifier = Arc::new(FailingNotifier {
            calls: AtomicUsize::new(0),
        });
        let handle = dispatch(notifier.clone(), "-100".into(), "hi".into());

        handle.await.expect("dispatch task must not panic");
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn disabled_notifier_accepts_everything() {
        let result = DisabledNotifier.send("-100", "hi").await;
        assert!(result.is_ok());
    }
}
