use std::sync::Arc;

use teloxide::prelude::*;

use taxbot_core::{domain::ChatId, format, menu};

use crate::router::AppState;

use super::{is_admin, ADMIN_REQUIRED};

/// The `<prefix>tax` command: show the control panel to administrators.
pub async fn handle_panel(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };

    if !is_admin(&bot, &msg.chat, user.id).await {
        let _ = bot.send_message(msg.chat.id, ADMIN_REQUIRED).await;
        return Ok(());
    }

    let sent = state
        .messenger
        .send_inline_keyboard(
            ChatId(msg.chat.id.0),
            &format::panel_html(),
            menu::panel_keyboard(),
        )
        .await;
    if let Err(e) = sent {
        tracing::warn!("failed to send control panel: {e}");
    }

    Ok(())
}
