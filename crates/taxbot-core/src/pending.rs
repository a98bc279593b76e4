//! In-flight "awaiting one channel id" prompts.
//!
//! The behavior is a per-interaction wait for exactly one follow-up message
//! from the same user in the same chat, bounded by a 30 second timeout. That
//! wait is an explicit record keyed by (chat, user) plus a watchdog task per
//! prompt; the watchdog owns the timeout reply, so a user who answers in time
//! never sees it and a silent user always does.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{ChatId, UserId},
    messaging::port::MessagingPort,
};

/// How long an add/remove prompt waits for the follow-up message.
pub const FOLLOW_UP_TIMEOUT: Duration = Duration::from_secs(30);

pub const TIME_EXPIRED: &str = "⏱ Time expired: no channel id received.";

/// Which mutation a prompt is waiting to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingKind {
    AddChannel,
    RemoveChannel,
}

struct Entry {
    kind: PendingKind,
    ticket: u64,
    cancel: CancellationToken,
}

/// At most one prompt per (chat, user); a new prompt replaces the old one and
/// cancels its watchdog. Tickets guard the race between a watchdog firing and
/// the entry it was armed for having been consumed or replaced.
#[derive(Clone)]
pub struct PendingPrompts {
    inner: Arc<PendingInner>,
}

struct PendingInner {
    messenger: Arc<dyn MessagingPort>,
    ttl: Duration,
    entries: Mutex<HashMap<(ChatId, UserId), Entry>>,
    seq: AtomicU64,
}

impl PendingPrompts {
    pub fn new(messenger: Arc<dyn MessagingPort>, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(PendingInner {
                messenger,
                ttl,
                entries: Mutex::new(HashMap::new()),
                seq: AtomicU64::new(0),
            }),
        }
    }

    /// Start (or restart) a prompt for this user in this chat. The timeout is
    /// timed from this call, i.e. from when the prompt was issued.
    pub async fn begin(&self, chat_id: ChatId, user_id: UserId, kind: PendingKind) {
        let ticket = self.inner.seq.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();

        {
            let mut entries = self.inner.entries.lock().await;
            let replaced = entries.insert(
                (chat_id, user_id),
                Entry {
                    kind,
                    ticket,
                    cancel: cancel.clone(),
                },
            );
            if let Some(old) = replaced {
                old.cancel.cancel();
            }
        }

        let this = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(this.inner.ttl) => this.expire(chat_id, user_id, ticket).await,
            }
        });
    }

    /// Consume the prompt for this (chat, user), if one is in flight.
    pub async fn take(&self, chat_id: ChatId, user_id: UserId) -> Option<PendingKind> {
        let entry = self.inner.entries.lock().await.remove(&(chat_id, user_id))?;
        entry.cancel.cancel();
        Some(entry.kind)
    }

    async fn expire(&self, chat_id: ChatId, user_id: UserId, ticket: u64) {
        let fired = {
            let mut entries = self.inner.entries.lock().await;
            match entries.get(&(chat_id, user_id)) {
                Some(entry) if entry.ticket == ticket => {
                    entries.remove(&(chat_id, user_id));
                    true
                }
                _ => false,
            }
        };

        if fired {
            if let Err(e) = self.inner.messenger.send_html(chat_id, TIME_EXPIRED).await {
                tracing::warn!("failed to send timeout notice to {}: {e}", chat_id.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use crate::{
        domain::{MessageId, MessageRef},
        messaging::types::{InlineKeyboard, MessagingCapabilities},
        Result,
    };

    #[derive(Default)]
    struct RecordingMessenger {
        sent: std::sync::Mutex<Vec<(ChatId, String)>>,
    }

    impl RecordingMessenger {
        fn sent(&self) -> Vec<(ChatId, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessagingPort for RecordingMessenger {
        fn capabilities(&self) -> MessagingCapabilities {
            MessagingCapabilities {
                supports_html: true,
                supports_inline_keyboards: true,
                max_message_len: 4096,
            }
        }

        async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
            self.sent.lock().unwrap().push((chat_id, html.to_string()));
            Ok(MessageRef {
                chat_id,
                message_id: MessageId(0),
            })
        }

        async fn delete_message(&self, _msg: MessageRef) -> Result<()> {
            Ok(())
        }

        async fn send_inline_keyboard(
            &self,
            chat_id: ChatId,
            text: &str,
            _keyboard: InlineKeyboard,
        ) -> Result<MessageRef> {
            self.send_html(chat_id, text).await
        }

        async fn answer_callback_query(
            &self,
            _callback_id: &str,
            _text: Option<&str>,
        ) -> Result<()> {
            Ok(())
        }
    }

    fn prompts(messenger: &Arc<RecordingMessenger>) -> PendingPrompts {
        PendingPrompts::new(messenger.clone(), FOLLOW_UP_TIMEOUT)
    }

    #[tokio::test(start_paused = true)]
    async fn silence_triggers_the_timeout_reply() {
        let messenger = Arc::new(RecordingMessenger::default());
        let pending = prompts(&messenger);

        pending
            .begin(ChatId(1), UserId(10), PendingKind::AddChannel)
            .await;
        tokio::time::sleep(Duration::from_secs(31)).await;

        let sent = messenger.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, ChatId(1));
        assert_eq!(sent[0].1, TIME_EXPIRED);
        assert_eq!(pending.take(ChatId(1), UserId(10)).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn a_timely_answer_suppresses_the_timeout() {
        let messenger = Arc::new(RecordingMessenger::default());
        let pending = prompts(&messenger);

        pending
            .begin(ChatId(1), UserId(10), PendingKind::RemoveChannel)
            .await;
        assert_eq!(
            pending.take(ChatId(1), UserId(10)).await,
            Some(PendingKind::RemoveChannel)
        );

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(messenger.sent().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn a_new_prompt_replaces_the_old_one() {
        let messenger = Arc::new(RecordingMessenger::default());
        let pending = prompts(&messenger);

        pending
            .begin(ChatId(1), UserId(10), PendingKind::AddChannel)
            .await;
        tokio::time::sleep(Duration::from_secs(10)).await;
        pending
            .begin(ChatId(1), UserId(10), PendingKind::RemoveChannel)
            .await;

        // Only the replacement is live, with its own full window.
        tokio::time::sleep(Duration::from_secs(25)).await;
        assert!(messenger.sent().is_empty());
        assert_eq!(
            pending.take(ChatId(1), UserId(10)).await,
            Some(PendingKind::RemoveChannel)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn prompts_for_different_users_are_independent() {
        let messenger = Arc::new(RecordingMessenger::default());
        let pending = prompts(&messenger);

        pending
            .begin(ChatId(1), UserId(10), PendingKind::AddChannel)
            .await;
        pending
            .begin(ChatId(1), UserId(11), PendingKind::AddChannel)
            .await;

        assert_eq!(
            pending.take(ChatId(1), UserId(10)).await,
            Some(PendingKind::AddChannel)
        );

        tokio::time::sleep(Duration::from_secs(31)).await;
        // Only the unanswered user gets the timeout notice.
        assert_eq!(messenger.sent().len(), 1);
        assert_eq!(pending.take(ChatId(1), UserId(11)).await, None);
    }
}
