pub mod domain;
pub mod error;
pub mod protocol;

/// Address of the deployed bank contract every client talks to by default.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x4c8EC2aCE06a70366C770BB7C6Fa18ea6B7A2735";
