pub mod cache;
pub mod error;
pub mod manager;
pub mod retry;
pub mod service;

#[cfg(test)]
mod tests;

pub use cache::{CacheStats, WordCache};
pub use error::{ErrorCode, ErrorDetails, LookupError, LookupManagerError};
pub use manager::{LookupConfig, LookupManager, LookupParams};
pub use retry::RetryPolicy;
pub use service::LookupService;
