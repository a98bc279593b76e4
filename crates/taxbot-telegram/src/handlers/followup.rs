use std::sync::Arc;

use teloxide::prelude::*;

use taxbot_core::{
    domain::{ChatId, MessageId, MessageRef},
    engine::{self, FollowUpOutcome},
    format::escape_html,
    pending::PendingKind,
};

use crate::router::AppState;

const SAVE_FAILED: &str = "⚠️ Could not save the configuration; nothing was changed.";

/// Apply the channel id a user sent in response to an add/remove prompt.
pub async fn handle_follow_up(
    bot: Bot,
    msg: Message,
    state: Arc<AppState>,
    kind: PendingKind,
    channel_id: String,
) -> ResponseResult<()> {
    let chat_id = ChatId(msg.chat.id.0);

    // Only the add path needs the chat resolved; any lookup failure reads the
    // same as an unknown id.
    let resolved_title = match kind {
        PendingKind::AddChannel => resolve_chat_title(&bot, &channel_id).await,
        PendingKind::RemoveChannel => None,
    };

    // One lock across decide + apply, so the mutation matches the decision.
    let (reply, applied) = {
        let mut store = state.store.lock().await;
        let outcome = engine::resolve_follow_up(
            store.config(),
            kind,
            &channel_id,
            resolved_title.is_some(),
        );

        match outcome {
            FollowUpOutcome::Added => match store.set_tax_channel(&channel_id) {
                Ok(()) => {
                    tracing::info!("tax channel added: {channel_id}");
                    let title = resolved_title.as_deref().unwrap_or(&channel_id);
                    (
                        format!("✅ Added <b>{}</b> to the tax system.", escape_html(title)),
                        true,
                    )
                }
                Err(e) => {
                    tracing::error!("failed to persist tax channel {channel_id}: {e}");
                    (SAVE_FAILED.to_string(), false)
                }
            },
            FollowUpOutcome::Removed => match store.clear_tax_channel(&channel_id) {
                Ok(_) => {
                    tracing::info!("tax channel removed: {channel_id}");
                    (
                        "✅ Removed the channel from the tax system.".to_string(),
                        true,
                    )
                }
                Err(e) => {
                    tracing::error!("failed to persist tax channel removal {channel_id}: {e}");
                    (SAVE_FAILED.to_string(), false)
                }
            },
            FollowUpOutcome::UnknownChannel => {
                ("No channel found with that id.".to_string(), false)
            }
            FollowUpOutcome::NotRegistered => (
                "That channel is not part of the tax system.".to_string(),
                false,
            ),
        }
    };

    if applied {
        delete_input(&state, &msg).await;
    }
    let _ = state.messenger.send_html(chat_id, &reply).await;

    Ok(())
}

async fn resolve_chat_title(bot: &Bot, channel_id: &str) -> Option<String> {
    let raw = channel_id.parse::<i64>().ok()?;
    let chat = bot.get_chat(teloxide::types::ChatId(raw)).await.ok()?;
    Some(chat.title().unwrap_or(channel_id).to_string())
}

/// The raw id should not linger in chat history; deletion is best-effort.
async fn delete_input(state: &AppState, msg: &Message) {
    let msg_ref = MessageRef {
        chat_id: ChatId(msg.chat.id.0),
        message_id: MessageId(msg.id.0),
    };
    if let Err(e) = state.messenger.delete_message(msg_ref).await {
        tracing::warn!("could not delete channel-id message: {e}");
    }
}
