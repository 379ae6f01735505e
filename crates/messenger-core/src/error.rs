use thiserror::Error;

/// Errors surfaced by mutating chain operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("chain not initialized: no genesis block")]
    NotInitialized,
    #[error("empty blocks are rejected by the chain configuration")]
    EmptyBlock,
    #[error("block index overflow after block {0}")]
    IndexOverflow(u64),
}

/// First integrity failure found while walking a chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("block {index}: stored hash does not match recomputed hash")]
    HashMismatch { index: usize },
    #[error("block {index}: prevHash does not match the previous block's hash")]
    BrokenLink { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown transaction encoding {0:?} (expected \"json\" or \"legacy-text\")")]
    UnknownEncoding(String),
    #[error("unknown resolve policy {0:?} (expected \"max-transactions\" or \"longest-valid\")")]
    UnknownPolicy(String),
}
