use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub mod chain;
pub mod config;
pub mod constants;
pub mod error;
pub mod resolve;
pub mod validate;

pub use chain::{Chain, ChainStats};
pub use config::{ChainConfig, ResolvePolicy, TxEncoding};
pub use error::{ChainError, ConfigError, ValidationError};

/// Lowercase hex SHA-256 digest.
pub type Hash = String;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub receiver: String,
    pub message: String,
}

impl Transaction {
    pub fn new(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: String,
    pub transactions: Vec<Transaction>,
    pub hash: Hash,
    #[serde(rename = "prevHash")]
    pub prev_hash: Hash,
}

impl Block {
    /// Build a block and seal it with its hash.
    pub fn new(
        index: u64,
        timestamp: String,
        transactions: Vec<Transaction>,
        prev_hash: Hash,
        encoding: TxEncoding,
    ) -> Self {
        let hash = block_hash(index, &timestamp, &transactions, &prev_hash, encoding);
        Self {
            index,
            timestamp,
            transactions,
            hash,
            prev_hash,
        }
    }

    /// Recompute the hash from the stored fields, ignoring `self.hash`.
    pub fn compute_hash(&self, encoding: TxEncoding) -> Hash {
        block_hash(
            self.index,
            &self.timestamp,
            &self.transactions,
            &self.prev_hash,
            encoding,
        )
    }

    pub fn is_genesis(&self) -> bool {
        self.index == constants::GENESIS_INDEX && self.prev_hash.is_empty()
    }
}

/// Digest of a block's fields.
///
/// The input is `decimal(index) ++ timestamp ++ encode(transactions) ++ prev_hash`
/// fed to SHA-256, rendered as lowercase hex.
pub fn block_hash(
    index: u64,
    timestamp: &str,
    transactions: &[Transaction],
    prev_hash: &str,
    encoding: TxEncoding,
) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(index.to_string().as_bytes());
    hasher.update(timestamp.as_bytes());
    hasher.update(encode_transactions(transactions, encoding).as_bytes());
    hasher.update(prev_hash.as_bytes());
    hex::encode(hasher.finalize())
}

/// Canonical text of a transaction list as it enters the hash.
pub fn encode_transactions(transactions: &[Transaction], encoding: TxEncoding) -> String {
    match encoding {
        // Field order follows the `Transaction` declaration.
        TxEncoding::Json => serde_json::to_string(transactions)
            .expect("string-only transactions always serialize to JSON"),
        TxEncoding::LegacyText => {
            let items: Vec<String> = transactions
                .iter()
                .map(|t| format!("{{{} {} {}}}", t.sender, t.receiver, t.message))
                .collect();
            format!("[{}]", items.join(" "))
        }
    }
}

/// Fresh block timestamp in the fixed [`constants::TIMESTAMP_FORMAT`].
pub fn now_timestamp() -> String {
    chrono::Utc::now()
        .format(constants::TIMESTAMP_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "2023-06-12 15:58:15";

    fn alice_to_bob() -> Vec<Transaction> {
        vec![Transaction::new("Alice", "Bob", "Hello!")]
    }

    #[test]
    fn legacy_hash_matches_fixed_vector() {
        let hash = block_hash(1, TS, &alice_to_bob(), "prev_hash", TxEncoding::LegacyText);
        assert_eq!(
            hash,
            "313173440e3ba65b25bdc10b3f2d4240a2053d23c2bffb050835264544b142bd"
        );
    }

    #[test]
    fn json_hash_matches_fixed_vector() {
        let hash = block_hash(1, TS, &alice_to_bob(), "prev_hash", TxEncoding::Json);
        assert_eq!(
            hash,
            "82ce611413e99e77e78e703caede396158265153759db5f8e55343f3f3cd9db4"
        );
    }

    #[test]
    fn empty_genesis_fields_hash() {
        // sha256("0" ++ "" ++ "[]" ++ "")
        let hash = block_hash(0, "", &[], "", TxEncoding::Json);
        assert_eq!(
            hash,
            "431bf5c814e384ce9fa40f655f4b94f7f6a8c8504ea4844c30c484ebf03121f1"
        );
        assert_eq!(hash.len(), constants::HASH_HEX_SIZE);
        assert_eq!(hash, block_hash(0, "", &[], "", TxEncoding::LegacyText));
    }

    #[test]
    fn hash_is_deterministic() {
        let a = block_hash(7, TS, &alice_to_bob(), "abc", TxEncoding::Json);
        let b = block_hash(7, TS, &alice_to_bob(), "abc", TxEncoding::Json);
        assert_eq!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn hash_changes_with_every_field() {
        let txs = alice_to_bob();
        let base = block_hash(1, TS, &txs, "prev_hash", TxEncoding::Json);

        assert_ne!(base, block_hash(2, TS, &txs, "prev_hash", TxEncoding::Json));
        assert_ne!(
            base,
            block_hash(1, "2023-06-12 15:58:16", &txs, "prev_hash", TxEncoding::Json)
        );
        assert_ne!(base, block_hash(1, TS, &txs, "prev_hasH", TxEncoding::Json));

        let mut sender = txs.clone();
        sender[0].sender = "Eve".into();
        let mut receiver = txs.clone();
        receiver[0].receiver = "Carol".into();
        let mut message = txs.clone();
        message[0].message = "Hello?".into();
        for changed in [sender, receiver, message] {
            assert_ne!(base, block_hash(1, TS, &changed, "prev_hash", TxEncoding::Json));
        }
        assert_ne!(base, block_hash(1, TS, &[], "prev_hash", TxEncoding::Json));
    }

    #[test]
    fn json_encoding_matches_serde() {
        let txs = vec![
            Transaction::new("Alice", "Bob", "say \"hi\"\n"),
            Transaction::new("Bob", "Zoë", "{x y}"),
        ];
        let encoded = encode_transactions(&txs, TxEncoding::Json);
        assert_eq!(encoded, serde_json::to_string(&txs).unwrap());
        // Key order and escaping are part of the hash input.
        assert_eq!(
            encoded,
            r#"[{"sender":"Alice","receiver":"Bob","message":"say \"hi\"\n"},{"sender":"Bob","receiver":"Zoë","message":"{x y}"}]"#
        );
    }

    #[test]
    fn json_encoding_is_unambiguous_where_legacy_is_not() {
        let a = vec![Transaction::new("A B", "C", "D")];
        let b = vec![Transaction::new("A", "B C", "D")];
        assert_eq!(
            encode_transactions(&a, TxEncoding::LegacyText),
            encode_transactions(&b, TxEncoding::LegacyText)
        );
        assert_ne!(
            encode_transactions(&a, TxEncoding::Json),
            encode_transactions(&b, TxEncoding::Json)
        );
    }

    #[test]
    fn legacy_encoding_layout() {
        let txs = vec![
            Transaction::new("Alice", "Bob", "Hello!"),
            Transaction::new("Bob", "Alice", "Hi"),
        ];
        assert_eq!(
            encode_transactions(&txs, TxEncoding::LegacyText),
            "[{Alice Bob Hello!} {Bob Alice Hi}]"
        );
        assert_eq!(encode_transactions(&[], TxEncoding::LegacyText), "[]");
    }

    #[test]
    fn block_new_seals_hash() {
        let block = Block::new(
            1,
            TS.into(),
            alice_to_bob(),
            "prev_hash".into(),
            TxEncoding::LegacyText,
        );
        assert_eq!(
            block.hash,
            "313173440e3ba65b25bdc10b3f2d4240a2053d23c2bffb050835264544b142bd"
        );
        assert_eq!(block.compute_hash(TxEncoding::LegacyText), block.hash);
        assert!(!block.is_genesis());
    }

    #[test]
    fn block_json_field_names() {
        let block = Block::new(
            1,
            TS.into(),
            alice_to_bob(),
            "prev_hash".into(),
            TxEncoding::Json,
        );
        let json: serde_json::Value = serde_json::to_value(&block).unwrap();
        assert_eq!(json["index"], 1);
        assert_eq!(json["timestamp"], TS);
        assert_eq!(json["prevHash"], "prev_hash");
        assert_eq!(json["hash"], block.hash.as_str());
        assert_eq!(json["transactions"][0]["sender"], "Alice");
        assert_eq!(json["transactions"][0]["receiver"], "Bob");
        assert_eq!(json["transactions"][0]["message"], "Hello!");
        let back: Block = serde_json::from_value(json).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn transaction_equality_is_structural() {
        assert_eq!(
            Transaction::new("Alice", "Bob", "Hello!"),
            Transaction::new("Alice", "Bob", "Hello!")
        );
        assert_ne!(
            Transaction::new("Alice", "Bob", "Hello!"),
            Transaction::new("Alice", "Bob", "Hello")
        );
    }

    #[test]
    fn timestamp_uses_fixed_format() {
        let ts = now_timestamp();
        assert!(ts.ends_with(" UTC"));
        assert!(chrono::NaiveDateTime::parse_from_str(
            ts.trim_end_matches(" UTC"),
            "%Y-%m-%d %H:%M:%S%.9f"
        )
        .is_ok());
    }
}
