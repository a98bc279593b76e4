/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so the core can
/// handle failures consistently (fatal vs user-visible).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file exists but does not parse. Distinct from "absent" so a
    /// corrupted file is never silently treated as a first run.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("platform error: {0}")]
    Platform(String),
}

pub type Result<T> = std::result::Result<T, Error>;
