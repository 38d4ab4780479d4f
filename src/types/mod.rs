mod metadata;
mod chunk;

pub use chunk::{ChunkId, ChunkRecord};
pub use metadata::FileRecord;
