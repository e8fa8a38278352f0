use alloy::{
    dyn_abi::TypedData,
    primitives::{Address, B256, Bytes, U256},
    providers::Provider,
};
use serde_json::json;

use crate::{
    client::WalletClient,
    constants::{ZKSYNC_DEFAULT_GAS_PER_PUBDATA, ZKSYNC_EIP712_TX_TYPE},
    error::ConnectError,
};

/// A zkSync EIP-712 (type 0x71) transaction, prior to signing
#[derive(Clone, Debug)]
pub struct Eip712Transaction {
    /// Sender; defaults to the wallet client's account
    pub from: Option<Address>,
    pub to: Address,
    pub gas_limit: U256,
    pub gas_per_pubdata_byte_limit: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    pub paymaster: Option<Address>,
    pub nonce: U256,
    pub value: U256,
    pub data: Bytes,
    pub factory_deps: Vec<B256>,
    pub paymaster_input: Bytes,
}

impl Default for Eip712Transaction {
    fn default() -> Self {
        Self {
            from: None,
            to: Address::ZERO,
            gas_limit: U256::ZERO,
            gas_per_pubdata_byte_limit: U256::from(ZKSYNC_DEFAULT_GAS_PER_PUBDATA),
            max_fee_per_gas: U256::ZERO,
            max_priority_fee_per_gas: U256::ZERO,
            paymaster: None,
            nonce: U256::ZERO,
            value: U256::ZERO,
            data: Bytes::new(),
            factory_deps: Vec::new(),
            paymaster_input: Bytes::new(),
        }
    }
}

// zkSync encodes addresses as uint256 in its typed transaction
fn address_word(address: Address) -> String {
    U256::from_be_slice(address.as_slice()).to_string()
}

impl Eip712Transaction {
    /// The typed data zkSync expects to be signed for this transaction
    pub fn typed_data(&self, chain_id: u64, default_from: Address) -> Result<TypedData, ConnectError> {
        let from = self.from.unwrap_or(default_from);
        let paymaster = self.paymaster.unwrap_or(Address::ZERO);

        let value = json!({
            "types": {
                "EIP712Domain": [
                    { "name": "name", "type": "string" },
                    { "name": "version", "type": "string" },
                    { "name": "chainId", "type": "uint256" }
                ],
                "Transaction": [
                    { "name": "txType", "type": "uint256" },
                    { "name": "from", "type": "uint256" },
                    { "name": "to", "type": "uint256" },
                    { "name": "gasLimit", "type": "uint256" },
                    { "name": "gasPerPubdataByteLimit", "type": "uint256" },
                    { "name": "maxFeePerGas", "type": "uint256" },
                    { "name": "maxPriorityFeePerGas", "type": "uint256" },
                    { "name": "paymaster", "type": "uint256" },
                    { "name": "nonce", "type": "uint256" },
                    { "name": "value", "type": "uint256" },
                    { "name": "data", "type": "bytes" },
                    { "name": "factoryDeps", "type": "bytes32[]" },
                    { "name": "paymasterInput", "type": "bytes" }
                ]
            },
            "primaryType": "Transaction",
            "domain": {
                "name": "zkSync",
                "version": "2",
                "chainId": format!("{chain_id:#x}")
            },
            "message": {
                "txType": ZKSYNC_EIP712_TX_TYPE.to_string(),
                "from": address_word(from),
                "to": address_word(self.to),
                "gasLimit": self.gas_limit.to_string(),
                "gasPerPubdataByteLimit": self.gas_per_pubdata_byte_limit.to_string(),
                "maxFeePerGas": self.max_fee_per_gas.to_string(),
                "maxPriorityFeePerGas": self.max_priority_fee_per_gas.to_string(),
                "paymaster": address_word(paymaster),
                "nonce": self.nonce.to_string(),
                "value": self.value.to_string(),
                "data": self.data,
                "factoryDeps": self.factory_deps,
                "paymasterInput": self.paymaster_input
            }
        });

        serde_json::from_value(value).map_err(|e| {
            ConnectError::validation(format!("Failed to build zkSync typed data: {e}"))
        })
    }
}

/// EIP-712 signing for zkSync-family chains; signatures come from the transport
#[derive(Clone, Copy, Debug)]
pub struct Eip712WalletActions<'a> {
    client: &'a WalletClient,
}

impl<'a> Eip712WalletActions<'a> {
    pub(crate) fn new(client: &'a WalletClient) -> Self {
        Self { client }
    }

    pub async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Bytes, ConnectError> {
        let signature: Bytes = self
            .client
            .provider()
            .raw_request(
                "eth_signTypedData_v4".into(),
                (self.client.account(), typed_data.clone()),
            )
            .await?;
        Ok(signature)
    }

    pub async fn sign_transaction(
        &self,
        transaction: &Eip712Transaction,
    ) -> Result<Bytes, ConnectError> {
        let chain_id = self.client.chain().numeric_id().ok_or_else(|| {
            ConnectError::validation(format!(
                "chain id {} is not numeric, cannot build EIP-712 domain",
                self.client.chain().chain_id
            ))
        })?;

        let typed_data = transaction.typed_data(chain_id, self.client.account())?;
        tracing::debug!(chain_id, account = ?self.client.account(), "Signing zkSync transaction");
        self.sign_typed_data(&typed_data).await
    }
}
