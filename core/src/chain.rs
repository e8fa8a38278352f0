use std::collections::BTreeMap;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::constants::{
    OP_STACK_GAS_PRICE_ORACLE, OP_STACK_L1_BLOCK, OP_STACK_L2_CROSS_DOMAIN_MESSENGER,
    OP_STACK_L2_ERC721_BRIDGE, OP_STACK_L2_STANDARD_BRIDGE, OP_STACK_L2_TO_L1_MESSAGE_PASSER,
    contract_names,
};

/// Groups chains that share non-standard RPC methods and contract predeploys
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChainFamily {
    #[serde(rename = "op-stack")]
    OpStack,
    Celo,
    #[serde(rename = "zksync")]
    ZkSync,
    #[default]
    #[serde(other)]
    Other,
}

/// How transactions on a chain are shaped on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TransactionFormat {
    #[default]
    Ethereum,
    /// Ethereum transactions plus the op-stack deposit type (0x7e)
    OpStackDeposit,
    /// Ethereum transactions plus CIP-64 fee-currency transactions
    CeloCip64,
    /// Ethereum transactions plus zkSync EIP-712 transactions (0x71)
    ZkSyncEip712,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainContract {
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_created: Option<u64>,
}

impl ChainContract {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            block_created: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Chain information as handed over by the network state.
///
/// The chain id is kept as the string the network state reported; it is only
/// interpreted on demand through [`ChainConfig::numeric_id`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    #[serde(default)]
    pub chain_type: ChainFamily,
    #[serde(default)]
    pub chain_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub rpc_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_explorer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_currency: Option<NativeCurrency>,
    #[serde(default)]
    pub contracts: BTreeMap<String, ChainContract>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_format: Option<TransactionFormat>,
}

/// A descriptor merged with its family defaults
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    pub family: ChainFamily,
    pub chain_id: String,
    pub name: Option<String>,
    pub rpc_urls: Vec<String>,
    pub block_explorer: Option<String>,
    pub native_currency: Option<NativeCurrency>,
    pub contracts: BTreeMap<String, ChainContract>,
    pub source_id: Option<u64>,
    pub tx_format: TransactionFormat,
}

impl ChainConfig {
    pub fn contract_address(&self, name: &str) -> Option<Address> {
        self.contracts.get(name).map(|contract| contract.address)
    }

    /// Chain id as a number, if the reported id is a decimal or 0x-prefixed integer
    pub fn numeric_id(&self) -> Option<u64> {
        let id = self.chain_id.trim();
        match id.strip_prefix("0x").or_else(|| id.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16).ok(),
            None => id.parse().ok(),
        }
    }
}

impl From<ChainDescriptor> for ChainConfig {
    fn from(descriptor: ChainDescriptor) -> Self {
        ChainConfig {
            family: descriptor.chain_type,
            chain_id: descriptor.chain_id,
            name: descriptor.name,
            rpc_urls: descriptor.rpc_urls,
            block_explorer: descriptor.block_explorer,
            native_currency: descriptor.native_currency,
            contracts: descriptor.contracts,
            source_id: descriptor.source_id,
            tx_format: descriptor.tx_format.unwrap_or_default(),
        }
    }
}

/// What a chain family brings along before any descriptor is applied
struct FamilyDefaults {
    contracts: BTreeMap<String, ChainContract>,
    tx_format: TransactionFormat,
}

impl FamilyDefaults {
    fn for_family(family: ChainFamily) -> Option<Self> {
        match family {
            ChainFamily::OpStack => Some(Self {
                contracts: [
                    (contract_names::GAS_PRICE_ORACLE, OP_STACK_GAS_PRICE_ORACLE),
                    (contract_names::L1_BLOCK, OP_STACK_L1_BLOCK),
                    (
                        contract_names::L2_CROSS_DOMAIN_MESSENGER,
                        OP_STACK_L2_CROSS_DOMAIN_MESSENGER,
                    ),
                    (contract_names::L2_ERC721_BRIDGE, OP_STACK_L2_ERC721_BRIDGE),
                    (contract_names::L2_STANDARD_BRIDGE, OP_STACK_L2_STANDARD_BRIDGE),
                    (
                        contract_names::L2_TO_L1_MESSAGE_PASSER,
                        OP_STACK_L2_TO_L1_MESSAGE_PASSER,
                    ),
                ]
                .into_iter()
                .map(|(name, address)| (name.to_string(), ChainContract::new(address)))
                .collect(),
                tx_format: TransactionFormat::OpStackDeposit,
            }),
            ChainFamily::Celo => Some(Self {
                contracts: BTreeMap::new(),
                tx_format: TransactionFormat::CeloCip64,
            }),
            ChainFamily::ZkSync => Some(Self {
                contracts: BTreeMap::new(),
                tx_format: TransactionFormat::ZkSyncEip712,
            }),
            ChainFamily::Other => None,
        }
    }
}

/// Resolves a descriptor into a chain config.
///
/// Known families start from their defaults and the descriptor is laid over
/// them, descriptor entries winning on collision (contracts are merged per
/// name). Unknown families pass the descriptor through as-is.
pub fn resolve_chain(descriptor: &ChainDescriptor) -> ChainConfig {
    let Some(defaults) = FamilyDefaults::for_family(descriptor.chain_type) else {
        return ChainConfig::from(descriptor.clone());
    };

    let mut contracts = defaults.contracts;
    contracts.extend(
        descriptor
            .contracts
            .iter()
            .map(|(name, contract)| (name.clone(), contract.clone())),
    );

    tracing::debug!(
        chain_id = %descriptor.chain_id,
        family = ?descriptor.chain_type,
        contracts = contracts.len(),
        "Resolved chain config"
    );

    ChainConfig {
        family: descriptor.chain_type,
        chain_id: descriptor.chain_id.clone(),
        name: descriptor.name.clone(),
        rpc_urls: descriptor.rpc_urls.clone(),
        block_explorer: descriptor.block_explorer.clone(),
        native_currency: descriptor.native_currency.clone(),
        contracts,
        source_id: descriptor.source_id,
        tx_format: descriptor.tx_format.unwrap_or(defaults.tx_format),
    }
}

impl ChainDescriptor {
    pub fn resolve(&self) -> ChainConfig {
        resolve_chain(self)
    }
}
