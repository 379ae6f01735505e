use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How a block's transaction list is serialized into the hash input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TxEncoding {
    /// Compact JSON array, keys in the order `sender`, `receiver`, `message`.
    #[default]
    Json,
    /// `[{sender receiver message} ...]` with no escaping. Only useful to
    /// reproduce hashes produced by the original messenger.
    LegacyText,
}

/// Chain-selection policy applied by [`crate::chain::Chain::resolve`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolvePolicy {
    /// Keep every block whose transaction count equals the largest count found.
    /// Can drop genesis and leave a chain that no longer validates.
    #[default]
    MaxTransactions,
    /// Keep the longest chain that validates, preferring the local one on ties.
    LongestValid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub encoding: TxEncoding,
    pub allow_empty_blocks: bool,
    pub resolve_policy: ResolvePolicy,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            encoding: TxEncoding::default(),
            allow_empty_blocks: true,
            resolve_policy: ResolvePolicy::default(),
        }
    }
}

impl FromStr for TxEncoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(TxEncoding::Json),
            "legacy-text" | "legacy" => Ok(TxEncoding::LegacyText),
            _ => Err(ConfigError::UnknownEncoding(s.to_string())),
        }
    }
}

impl fmt::Display for TxEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxEncoding::Json => f.write_str("json"),
            TxEncoding::LegacyText => f.write_str("legacy-text"),
        }
    }
}

impl FromStr for ResolvePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "max-transactions" | "max-tx" => Ok(ResolvePolicy::MaxTransactions),
            "longest-valid" => Ok(ResolvePolicy::LongestValid),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for ResolvePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvePolicy::MaxTransactions => f.write_str("max-transactions"),
            ResolvePolicy::LongestValid => f.write_str("longest-valid"),
        }
    }
}
