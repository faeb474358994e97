use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("Failed to read or write the state file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize the state: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] configuration::error::ConfigError),
}
