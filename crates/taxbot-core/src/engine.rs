//! Pure decision logic for inbound events.
//!
//! Handlers feed in the current config plus whatever platform context they
//! already resolved, and get back a value describing what to do. All I/O
//! (replies, persistence, message deletion, permission lookups) stays at the
//! adapter boundary, which keeps this layer testable without a connection.

use crate::{
    config::BotConfig,
    pending::PendingKind,
    tax::{self, TaxQuote},
};

/// What the router should do with an inbound text message.
#[derive(Clone, Debug, PartialEq)]
pub enum MessageOutcome {
    /// A pending add/remove prompt consumes this message as a channel id.
    FollowUpInput {
        kind: PendingKind,
        channel_id: String,
    },
    /// The panel command (prefix + "tax"). The admin guard applies at the
    /// boundary, where the capability can be resolved.
    OpenPanel,
    /// Numeric message in a registered channel.
    Quote(TaxQuote),
    Ignore,
}

pub fn classify_message(
    config: &BotConfig,
    chat_key: &str,
    pending: Option<PendingKind>,
    text: &str,
) -> MessageOutcome {
    // An in-flight prompt wins over everything else: the next message from
    // that user in that chat is the channel id, whatever it looks like.
    if let Some(kind) = pending {
        return MessageOutcome::FollowUpInput {
            kind,
            channel_id: text.trim().to_string(),
        };
    }

    if text == format!("{}tax", config.prefix) {
        return MessageOutcome::OpenPanel;
    }

    if config.is_tax_channel(chat_key) {
        if let Some(amount) = tax::parse_amount(text) {
            return MessageOutcome::Quote(tax::quote(amount));
        }
    }

    MessageOutcome::Ignore
}

/// Outcome of applying a follow-up channel id to a pending prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FollowUpOutcome {
    /// Insert the channel and persist.
    Added,
    /// Remove the channel and persist.
    Removed,
    /// Add target did not resolve to a real chat; no mutation.
    UnknownChannel,
    /// Remove target is not registered; no mutation.
    NotRegistered,
}

pub fn resolve_follow_up(
    config: &BotConfig,
    kind: PendingKind,
    channel_id: &str,
    channel_exists: bool,
) -> FollowUpOutcome {
    match kind {
        PendingKind::AddChannel if !channel_exists => FollowUpOutcome::UnknownChannel,
        PendingKind::AddChannel => FollowUpOutcome::Added,
        PendingKind::RemoveChannel if !config.is_tax_channel(channel_id) => {
            FollowUpOutcome::NotRegistered
        }
        PendingKind::RemoveChannel => FollowUpOutcome::Removed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(channels: &[&str]) -> BotConfig {
        let mut config = BotConfig::default();
        for id in channels {
            config.tax_channels.insert(id.to_string(), true);
        }
        config
    }

    #[test]
    fn numeric_message_in_unregistered_chat_is_ignored() {
        let config = BotConfig::default();
        assert_eq!(
            classify_message(&config, "42", None, "100"),
            MessageOutcome::Ignore
        );
    }

    #[test]
    fn numeric_message_in_registered_chat_quotes() {
        let config = config_with(&["42"]);
        match classify_message(&config, "42", None, "100") {
            MessageOutcome::Quote(q) => {
                assert_eq!(q.amount, 100.0);
                assert_eq!(q.tax, 6.0);
                assert_eq!(q.total, 106.0);
            }
            other => panic!("expected a quote, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_message_in_registered_chat_is_ignored() {
        let config = config_with(&["42"]);
        assert_eq!(
            classify_message(&config, "42", None, "hello"),
            MessageOutcome::Ignore
        );
    }

    #[test]
    fn panel_command_requires_an_exact_prefix_match() {
        let config = BotConfig::default();
        assert_eq!(
            classify_message(&config, "1", None, "-tax"),
            MessageOutcome::OpenPanel
        );
        assert_eq!(
            classify_message(&config, "1", None, "-taxx"),
            MessageOutcome::Ignore
        );
        assert_eq!(
            classify_message(&config, "1", None, "!tax"),
            MessageOutcome::Ignore
        );
    }

    #[test]
    fn panel_command_follows_the_configured_prefix() {
        let mut config = BotConfig::default();
        config.prefix = "!".to_string();
        assert_eq!(
            classify_message(&config, "1", None, "!tax"),
            MessageOutcome::OpenPanel
        );
        assert_eq!(
            classify_message(&config, "1", None, "-tax"),
            MessageOutcome::Ignore
        );
    }

    #[test]
    fn pending_prompt_consumes_any_message() {
        // Even command- or number-shaped text becomes the channel id.
        let config = config_with(&["42"]);
        assert_eq!(
            classify_message(&config, "42", Some(PendingKind::AddChannel), " 77 "),
            MessageOutcome::FollowUpInput {
                kind: PendingKind::AddChannel,
                channel_id: "77".to_string(),
            }
        );
        assert_eq!(
            classify_message(&config, "42", Some(PendingKind::RemoveChannel), "-tax"),
            MessageOutcome::FollowUpInput {
                kind: PendingKind::RemoveChannel,
                channel_id: "-tax".to_string(),
            }
        );
    }

    #[test]
    fn add_resolves_by_chat_existence() {
        let config = BotConfig::default();
        assert_eq!(
            resolve_follow_up(&config, PendingKind::AddChannel, "77", true),
            FollowUpOutcome::Added
        );
        assert_eq!(
            resolve_follow_up(&config, PendingKind::AddChannel, "77", false),
            FollowUpOutcome::UnknownChannel
        );
    }

    #[test]
    fn remove_resolves_by_registration() {
        let config = config_with(&["42"]);
        assert_eq!(
            resolve_follow_up(&config, PendingKind::RemoveChannel, "42", false),
            FollowUpOutcome::Removed
        );
        assert_eq!(
            resolve_follow_up(&config, PendingKind::RemoveChannel, "77", false),
            FollowUpOutcome::NotRegistered
        );
    }
}
