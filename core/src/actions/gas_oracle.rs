use alloy::{
    primitives::{Address, U256},
    sol,
};

use crate::{
    chain::ChainConfig, client::PublicClient, constants::OP_STACK_GAS_PRICE_ORACLE,
    constants::contract_names,
};

sol! {
    #[sol(rpc)]
    contract GasPriceOracle {
        function l1BaseFee() external view returns (uint256);
        function scalar() external view returns (uint256);
        function getL1Fee(bytes memory data) external view returns (uint256);
        function getL1GasUsed(bytes memory data) external view returns (uint256);
    }
}

/// Optional overrides for gas price oracle reads
#[derive(Clone, Debug, Default)]
pub struct GasPriceOracleParameters {
    /// Chain to look the oracle up on, instead of the client's chain
    pub chain: Option<ChainConfig>,
    /// Oracle address, bypassing the chain lookup entirely
    pub gas_price_oracle_address: Option<Address>,
}

impl GasPriceOracleParameters {
    pub fn with_address(address: Address) -> Self {
        Self {
            chain: None,
            gas_price_oracle_address: Some(address),
        }
    }

    pub fn with_chain(chain: ChainConfig) -> Self {
        Self {
            chain: Some(chain),
            gas_price_oracle_address: None,
        }
    }
}

/// Picks the oracle address: explicit override, then the chain's registered
/// `gasPriceOracle`, then the op-stack predeploy.
pub fn gas_price_oracle_address(
    client_chain: &ChainConfig,
    params: &GasPriceOracleParameters,
) -> Address {
    if let Some(address) = params.gas_price_oracle_address {
        return address;
    }

    let chain = params.chain.as_ref().unwrap_or(client_chain);
    chain
        .contract_address(contract_names::GAS_PRICE_ORACLE)
        .unwrap_or(OP_STACK_GAS_PRICE_ORACLE)
}

/// Reads the L1 base fee (in wei) from the gas price oracle
pub async fn get_l1_base_fee(
    client: &PublicClient,
    params: GasPriceOracleParameters,
) -> Result<U256, alloy::contract::Error> {
    let address = gas_price_oracle_address(client.chain(), &params);
    tracing::debug!(oracle = ?address, chain_id = %client.chain().chain_id, "Reading l1BaseFee");

    GasPriceOracle::new(address, client.provider())
        .l1BaseFee()
        .call()
        .await
}

/// Reads the L1 fee scalar from the gas price oracle
pub async fn get_l1_fee_scalar(
    client: &PublicClient,
    params: GasPriceOracleParameters,
) -> Result<U256, alloy::contract::Error> {
    let address = gas_price_oracle_address(client.chain(), &params);
    tracing::debug!(oracle = ?address, chain_id = %client.chain().chain_id, "Reading scalar");

    GasPriceOracle::new(address, client.provider())
        .scalar()
        .call()
        .await
}

/// Gas oracle reads bound to a client, available once the client carries
/// [`crate::client::PublicActions::GasOracle`]
#[derive(Clone, Copy, Debug)]
pub struct GasOracleActions<'a> {
    client: &'a PublicClient,
}

impl<'a> GasOracleActions<'a> {
    pub(crate) fn new(client: &'a PublicClient) -> Self {
        Self { client }
    }

    pub async fn get_l1_base_fee(
        &self,
        params: GasPriceOracleParameters,
    ) -> Result<U256, alloy::contract::Error> {
        get_l1_base_fee(self.client, params).await
    }

    pub async fn get_l1_fee_scalar(
        &self,
        params: GasPriceOracleParameters,
    ) -> Result<U256, alloy::contract::Error> {
        get_l1_fee_scalar(self.client, params).await
    }
}
