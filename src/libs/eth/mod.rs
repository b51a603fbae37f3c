//! Talking to an Ethereum compatible node: the JSON-RPC client, key
//! material helpers and the high level spells built on both.

pub mod client;
pub mod keys;
pub mod spells;
