//! Telegram update handlers.
//!
//! Each handler resolves the platform context the core cannot see (sender,
//! admin capability, chat lookups), asks the engine what to do, and performs
//! the replies and mutations it decided on.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message},
};

use taxbot_core::{
    domain::{ChatId, UserId},
    engine::{self, MessageOutcome},
};

use crate::router::AppState;

mod callback;
mod followup;
mod panel;
mod quote;

pub(crate) const ADMIN_REQUIRED: &str =
    "You need the administrator permission to manage tax channels.";

pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    callback::handle_callback(bot, q, state).await
}

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    if user.is_bot {
        return Ok(());
    }
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let chat_id = ChatId(msg.chat.id.0);
    let user_id = UserId(user.id.0 as i64);

    // Consuming the pending prompt here, before classification, is what gives
    // the "next message from that user in that chat" guarantee.
    let pending = state.pending.take(chat_id, user_id).await;

    let outcome = {
        let store = state.store.lock().await;
        engine::classify_message(store.config(), &chat_id.key(), pending, text)
    };

    match outcome {
        MessageOutcome::FollowUpInput { kind, channel_id } => {
            followup::handle_follow_up(bot, msg, state, kind, channel_id).await
        }
        MessageOutcome::OpenPanel => panel::handle_panel(bot, msg, state).await,
        MessageOutcome::Quote(quote) => quote::reply_quote(msg, state, quote).await,
        MessageOutcome::Ignore => Ok(()),
    }
}

/// Administrator capability: admin or owner of the chat. A private chat is
/// trivially managed by its own user.
pub(crate) async fn is_admin(
    bot: &Bot,
    chat: &teloxide::types::Chat,
    user: teloxide::types::UserId,
) -> bool {
    if chat.is_private() {
        return true;
    }
    match bot.get_chat_member(chat.id, user).await {
        Ok(member) => member.is_privileged(),
        Err(e) => {
            tracing::warn!("admin check failed for {user} in {}: {e}", chat.id);
            false
        }
    }
}
