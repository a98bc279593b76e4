use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use tokio::sync::Mutex;

use taxbot_core::{
    config::ConfigStore,
    messaging::port::MessagingPort,
    pending::{PendingPrompts, FOLLOW_UP_TIMEOUT},
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<ConfigStore>>,
    pub messenger: Arc<dyn MessagingPort>,
    pub pending: PendingPrompts,
}

pub async fn run_polling(store: Arc<Mutex<ConfigStore>>) -> anyhow::Result<()> {
    let (token, prefix, channels) = {
        let store = store.lock().await;
        let config = store.config();
        (
            config.token.clone(),
            config.prefix.clone(),
            config.tax_channels.len(),
        )
    };

    let bot = Bot::new(token);

    // Login gate: a bad token or unreachable API is fatal here, never retried.
    let me = bot
        .get_me()
        .await
        .map_err(|e| anyhow::anyhow!("login failed: {e}"))?;
    tracing::info!("taxbot started: @{}", me.username());
    tracing::info!("panel command: {prefix}tax, tax channels configured: {channels}");

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let pending = PendingPrompts::new(messenger.clone(), FOLLOW_UP_TIMEOUT);

    let state = Arc::new(AppState {
        store,
        messenger,
        pending,
    });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
