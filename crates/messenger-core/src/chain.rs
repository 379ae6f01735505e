use crate::{
    constants::{GENESIS_INDEX, GENESIS_PREV_HASH},
    now_timestamp, resolve, validate, Block, ChainConfig, ChainError, Transaction,
    ValidationError,
};
use serde::Serialize;
use tracing::{debug, info};

/// In-memory, append-only message chain.
///
/// Mutation goes through `&mut self`; callers sharing a chain across tasks
/// must hold a single lock around it.
#[derive(Clone, Debug)]
pub struct Chain {
    blocks: Vec<Block>,
    config: ChainConfig,
    resolutions: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChainStats {
    pub height: u64,
    pub blocks: usize,
    pub transactions: usize,
    pub conflict_resolutions: u64,
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Chain {
    /// A fresh chain holding only the genesis block.
    pub fn new() -> Self {
        Self::with_config(ChainConfig::default())
    }

    pub fn with_config(config: ChainConfig) -> Self {
        let genesis = genesis_block(&config);
        debug!(hash = %genesis.hash, "genesis block created");
        Self {
            blocks: vec![genesis],
            config,
            resolutions: 0,
        }
    }

    /// Wrap an existing block sequence. Nothing is checked; call
    /// [`Chain::verify`] if the blocks come from outside.
    pub fn from_blocks(blocks: Vec<Block>, config: ChainConfig) -> Self {
        Self {
            blocks,
            config,
            resolutions: 0,
        }
    }

    /// Seal a new block over `transactions` on top of the current tip.
    /// Returns the new block's index.
    pub fn append(&mut self, transactions: Vec<Transaction>) -> Result<u64, ChainError> {
        if transactions.is_empty() && !self.config.allow_empty_blocks {
            return Err(ChainError::EmptyBlock);
        }
        let prev = self.blocks.last().ok_or(ChainError::NotInitialized)?;
        let next = prev
            .index
            .checked_add(1)
            .ok_or(ChainError::IndexOverflow(prev.index))?;
        let block = Block::new(
            next,
            now_timestamp(),
            transactions,
            prev.hash.clone(),
            self.config.encoding,
        );
        let index = block.index;
        debug!(index, hash = %block.hash, txs = block.transactions.len(), "appended block");
        self.blocks.push(block);
        Ok(index)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block at position `index` in the sequence.
    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn last(&self) -> Option<&Block> {
        self.blocks.last()
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn validate(&self) -> bool {
        validate::validate(&self.blocks, self.config.encoding)
    }

    pub fn verify(&self) -> Result<(), ValidationError> {
        validate::verify(&self.blocks, self.config.encoding)
    }

    /// Apply the configured resolve policy to the local chain alone.
    pub fn resolve(&mut self) -> bool {
        self.resolve_with(&[])
    }

    /// Apply the configured resolve policy, also considering `candidates`.
    /// Returns true when the block sequence was replaced.
    pub fn resolve_with(&mut self, candidates: &[Vec<Block>]) -> bool {
        self.resolutions += 1;
        let selected = resolve::select(
            &self.blocks,
            candidates,
            self.config.resolve_policy,
            self.config.encoding,
        );
        let replaced = match selected {
            Some(blocks) if blocks != self.blocks => {
                self.blocks = blocks;
                true
            }
            _ => false,
        };
        info!(
            policy = %self.config.resolve_policy,
            replaced,
            len = self.blocks.len(),
            "conflict resolution completed"
        );
        replaced
    }

    pub fn stats(&self) -> ChainStats {
        ChainStats {
            height: self.blocks.last().map(|b| b.index).unwrap_or(0),
            blocks: self.blocks.len(),
            transactions: self.blocks.iter().map(|b| b.transactions.len()).sum(),
            conflict_resolutions: self.resolutions,
        }
    }
}

/// Index 0, no transactions, empty prevHash, fresh timestamp.
pub fn genesis_block(config: &ChainConfig) -> Block {
    Block::new(
        GENESIS_INDEX,
        now_timestamp(),
        Vec::new(),
        GENESIS_PREV_HASH.to_string(),
        config.encoding,
    )
}
