use crate::{Block, TxEncoding, ValidationError};
use tracing::warn;

/// True when every non-genesis block re-hashes to its stored hash and links
/// to its predecessor. Chains of zero or one block are valid.
pub fn validate(blocks: &[Block], encoding: TxEncoding) -> bool {
    verify(blocks, encoding).is_ok()
}

/// Like [`validate`] but reports the first failing block.
pub fn verify(blocks: &[Block], encoding: TxEncoding) -> Result<(), ValidationError> {
    for (i, pair) in blocks.windows(2).enumerate() {
        let (prev, current) = (&pair[0], &pair[1]);
        let index = i + 1;

        if current.hash != current.compute_hash(encoding) {
            warn!(index, "block hash mismatch");
            return Err(ValidationError::HashMismatch { index });
        }
        if current.prev_hash != prev.hash {
            warn!(index, "block prevHash does not link to predecessor");
            return Err(ValidationError::BrokenLink { index });
        }
    }
    Ok(())
}
