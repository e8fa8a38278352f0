//! Chain-family method sets that [`crate::client`] layers onto clients

pub mod eip712;
pub mod gas_oracle;
pub mod op_stack;
