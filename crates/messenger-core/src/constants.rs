pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
pub const GENESIS_INDEX: u64 = 0;
pub const GENESIS_PREV_HASH: &str = "";
/// chrono format for block timestamps. Fixed so re-hashing sees the same text.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f UTC";
