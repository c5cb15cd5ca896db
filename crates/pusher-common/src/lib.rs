pub mod config;
pub mod errors;

pub use config::{LogConfig, PusherConfig, DEFAULT_LOG_FILTER};
pub use errors::{ChannelError, ConfigError, DecodeError, PusherError};

pub type Result<T> = std::result::Result<T, PusherError>;
