use thiserror::Error;

/// Errors raised outside the simulation core: configuration and terminal I/O.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid color {0:?}, expected #RRGGBB")]
    InvalidColor(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
