use std::sync::Arc;

use teloxide::prelude::*;

use taxbot_core::{
    domain::{ChatId, UserId},
    format,
    menu::MenuAction,
    pending::PendingKind,
};

use crate::router::AppState;

use super::{is_admin, ADMIN_REQUIRED};

const ADD_PROMPT: &str = "Send the id of the channel to add to the tax system:";
const REMOVE_PROMPT: &str = "Send the id of the channel to remove from the tax system:";

/// A control-panel menu selection.
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let cb_id = q.id.clone();
    let data = q.data.clone().unwrap_or_default();

    // Panel messages are regular messages, so a query without one is stale.
    let Some(message) = q.message.as_ref() else {
        let _ = state.messenger.answer_callback_query(&cb_id, None).await;
        return Ok(());
    };

    let Some(action) = MenuAction::parse(&data) else {
        let _ = state.messenger.answer_callback_query(&cb_id, None).await;
        return Ok(());
    };

    if !is_admin(&bot, &message.chat, q.from.id).await {
        let _ = state
            .messenger
            .answer_callback_query(&cb_id, Some(ADMIN_REQUIRED))
            .await;
        return Ok(());
    }

    let chat_id = ChatId(message.chat.id.0);
    let user_id = UserId(q.from.id.0 as i64);

    match action {
        MenuAction::AddTaxChannel => {
            let _ = state.messenger.answer_callback_query(&cb_id, None).await;
            prompt_for_channel(&state, chat_id, user_id, PendingKind::AddChannel, ADD_PROMPT).await;
        }
        MenuAction::RemoveTaxChannel => {
            let _ = state.messenger.answer_callback_query(&cb_id, None).await;
            prompt_for_channel(
                &state,
                chat_id,
                user_id,
                PendingKind::RemoveChannel,
                REMOVE_PROMPT,
            )
            .await;
        }
        MenuAction::ShowTaxChannels => {
            let listing = {
                let store = state.store.lock().await;
                format::tax_channel_list_html(store.config().tax_channel_ids())
            };
            let _ = state.messenger.answer_callback_query(&cb_id, None).await;
            let _ = state.messenger.send_html(chat_id, &listing).await;
        }
    }

    Ok(())
}

/// Ask for a channel id and arm the 30 second window. The window is timed
/// from the prompt, so the prompt must land before the wait starts.
async fn prompt_for_channel(
    state: &AppState,
    chat_id: ChatId,
    user_id: UserId,
    kind: PendingKind,
    prompt: &str,
) {
    match state.messenger.send_html(chat_id, prompt).await {
        Ok(_) => state.pending.begin(chat_id, user_id, kind).await,
        Err(e) => tracing::warn!("failed to send channel-id prompt: {e}"),
    }
}
