use std::sync::Arc;

use teloxide::prelude::*;

use taxbot_core::{domain::ChatId, format, tax::TaxQuote};

use crate::router::AppState;

/// Reply to a numeric message in a registered tax channel.
pub async fn reply_quote(msg: Message, state: Arc<AppState>, quote: TaxQuote) -> ResponseResult<()> {
    if let Err(e) = state
        .messenger
        .send_html(ChatId(msg.chat.id.0), &format::quote_html(&quote))
        .await
    {
        tracing::warn!("failed to send tax quote: {e}");
    }
    Ok(())
}
