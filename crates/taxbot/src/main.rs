use std::sync::Arc;

use tokio::sync::Mutex;

use taxbot_core::config::{self, ConfigStore, LoadOutcome};

/// Exit status asking the operator to fill in the config file.
const EXIT_NEEDS_CONFIG: i32 = 2;

#[tokio::main]
async fn main() -> Result<(), taxbot_core::Error> {
    taxbot_core::logging::init("taxbot")?;

    let path = config::config_path();
    let store = match ConfigStore::load_or_init(&path)? {
        LoadOutcome::Loaded(store) => {
            tracing::info!("configuration loaded from {}", store.path().display());
            store
        }
        LoadOutcome::Initialized(created) => {
            tracing::warn!(
                "created {}; add the bot token and restart",
                created.display()
            );
            std::process::exit(EXIT_NEEDS_CONFIG);
        }
    };

    if store.config().token.trim().is_empty() {
        tracing::error!("no bot token in {}; add one and restart", path.display());
        std::process::exit(EXIT_NEEDS_CONFIG);
    }

    taxbot_telegram::router::run_polling(Arc::new(Mutex::new(store)))
        .await
        .map_err(|e| taxbot_core::Error::Platform(format!("telegram bot failed: {e}")))?;

    Ok(())
}
