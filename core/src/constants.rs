use alloy::primitives::{Address, address};

/// Predeploy holding the L1 fee inputs on op-stack chains
pub const OP_STACK_GAS_PRICE_ORACLE: Address =
    address!("0x420000000000000000000000000000000000000F");

pub const OP_STACK_L1_BLOCK: Address = address!("0x4200000000000000000000000000000000000015");

pub const OP_STACK_L2_CROSS_DOMAIN_MESSENGER: Address =
    address!("0x4200000000000000000000000000000000000007");

pub const OP_STACK_L2_ERC721_BRIDGE: Address =
    address!("0x4200000000000000000000000000000000000014");

pub const OP_STACK_L2_STANDARD_BRIDGE: Address =
    address!("0x4200000000000000000000000000000000000010");

pub const OP_STACK_L2_TO_L1_MESSAGE_PASSER: Address =
    address!("0x4200000000000000000000000000000000000016");

/// Contract names as they appear in a chain's contract registry
pub mod contract_names {
    pub const GAS_PRICE_ORACLE: &str = "gasPriceOracle";
    pub const L1_BLOCK: &str = "l1Block";
    pub const L2_CROSS_DOMAIN_MESSENGER: &str = "l2CrossDomainMessenger";
    pub const L2_ERC721_BRIDGE: &str = "l2Erc721Bridge";
    pub const L2_STANDARD_BRIDGE: &str = "l2StandardBridge";
    pub const L2_TO_L1_MESSAGE_PASSER: &str = "l2ToL1MessagePasser";
    pub const L2_OUTPUT_ORACLE: &str = "l2OutputOracle";
    pub const PORTAL: &str = "portal";
}

/// zkSync EIP-712 transaction type
pub const ZKSYNC_EIP712_TX_TYPE: u64 = 0x71;

/// Default gas per pubdata byte used by zkSync EIP-712 transactions
pub const ZKSYNC_DEFAULT_GAS_PER_PUBDATA: u64 = 50_000;
