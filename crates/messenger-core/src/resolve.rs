//! Chain selection applied when resolving conflicts.
//!
//! `MaxTransactions` is the messenger's historical policy: it compares blocks
//! by transaction count rather than chains by length, and happily stitches
//! non-contiguous blocks together. The resulting chain usually fails
//! validation. `LongestValid` is the conventional rule and is opt-in.

use crate::{validate::validate, Block, ResolvePolicy, TxEncoding};

/// Pick the block sequence the chain should hold after resolution.
/// `None` means keep the local sequence as is.
pub fn select(
    local: &[Block],
    candidates: &[Vec<Block>],
    policy: ResolvePolicy,
    encoding: TxEncoding,
) -> Option<Vec<Block>> {
    match policy {
        ResolvePolicy::MaxTransactions => max_transactions(local),
        ResolvePolicy::LongestValid => longest_valid(local, candidates, encoding),
    }
}

/// Every local block whose transaction count equals the largest count, in order.
pub fn max_transactions(local: &[Block]) -> Option<Vec<Block>> {
    let max = local.iter().map(|b| b.transactions.len()).max()?;
    Some(
        local
            .iter()
            .filter(|b| b.transactions.len() == max)
            .cloned()
            .collect(),
    )
}

/// Longest chain among `local` and `candidates` that validates. The local
/// chain wins ties.
pub fn longest_valid(
    local: &[Block],
    candidates: &[Vec<Block>],
    encoding: TxEncoding,
) -> Option<Vec<Block>> {
    let mut best: Option<&[Block]> = validate(local, encoding).then_some(local);
    for candidate in candidates {
        if candidate.is_empty() || !validate(candidate, encoding) {
            continue;
        }
        if best.map_or(true, |b| candidate.len() > b.len()) {
            best = Some(candidate);
        }
    }
    best.map(<[Block]>::to_vec)
}
