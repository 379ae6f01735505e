pub(crate) const DEFAULT_LISTEN: &str = "127.0.0.1:8080";
pub(crate) const PAGE_TITLE: &str = "Blockchain Messenger";
pub(crate) const MSG_FIELDS_REQUIRED: &str = "All fields are required";
pub(crate) const MSG_CHAIN_VALID: &str = "Blockchain is valid.";
pub(crate) const MSG_CHAIN_INVALID: &str = "Blockchain is not valid.";
pub(crate) const MSG_RESOLVED: &str = "Conflict resolution completed.";
