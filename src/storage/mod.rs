pub mod backend;
pub mod cache;
pub mod disk;
pub mod memory;
pub mod metadata;
pub mod router;
