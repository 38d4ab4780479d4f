pub mod error;
pub mod storage;
pub mod chunk;
pub mod config;

mod manager;
mod types;

pub use error::{Result, StorageError};
pub use manager::StorageManager;
pub use types::*;
