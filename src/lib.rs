pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod sentiment;
pub mod timing;
pub mod token_store;
pub mod types;
pub mod utils;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use sentiment::{classify, SentimentLevel};
pub use timing::{retry, Debouncer, Throttler};
pub use token_store::{MemoryTokenStore, SqliteTokenStore, TokenStore};
pub use types::*;
#[allow(unused_imports)]
pub use utils::*;
