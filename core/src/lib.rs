pub mod actions;
pub mod chain;
pub mod client;
pub mod constants;
pub mod contract;
pub mod error;
pub mod transport;

pub use chain::{ChainConfig, ChainDescriptor, ChainFamily, resolve_chain};
pub use client::{ClientPair, PublicClient, WalletClient, compose_clients};
pub use contract::{ContractHandle, ContractSpec, wrap_contract};
pub use error::ConnectError;
