#![forbid(unsafe_code)]

pub mod cancel;
pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod repository;
pub mod session;

pub use cancel::{CancelSignal, Cancelled};
pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;
pub use memory::{FailureKind, InMemoryBackend, Operation};
pub use repository::Backend;
pub use session::{FileTokenStore, MemoryTokenStore, Session, TokenStore, TokenStoreError};
