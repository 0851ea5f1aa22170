pub mod bus;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod types;

pub use bus::{StatusBus, StatusFeed};
pub use config::RunConfig;
pub use error::{ConfigError, PlatformError};
pub use lifecycle::LifecycleController;
pub use types::*;
