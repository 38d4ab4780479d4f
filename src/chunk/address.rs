use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::{ChunkId, Result};

const CHECKSUM_BUFFER_SIZE: usize = 64 * 1024;

/// Content address of a byte buffer.
pub fn address_of(data: &[u8]) -> ChunkId {
    let mut hasher = Sha256::new();
    hasher.update(data);
    ChunkId(hex::encode(hasher.finalize()))
}

/// Whole-file checksum, streamed from disk so the file is never held in memory.
pub async fn checksum_of<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut file = File::open(path.as_ref()).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHECKSUM_BUFFER_SIZE];

    loop {
        let read = file.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Case-insensitive comparison of two hex digests.
pub fn checksums_match(left: &str, right: &str) -> bool {
    left.eq_ignore_ascii_case(right)
}
