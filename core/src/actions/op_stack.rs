//! op-stack read and write method sets

use alloy::{
    primitives::{Address, B256, Bytes, TxHash, U256},
    providers::Provider,
    rpc::types::TransactionRequest,
    sol,
};

use crate::{
    actions::gas_oracle::{
        GasPriceOracle, GasPriceOracleParameters, gas_price_oracle_address, get_l1_base_fee,
        get_l1_fee_scalar,
    },
    client::{PublicClient, WalletClient},
    constants::{OP_STACK_L2_TO_L1_MESSAGE_PASSER, contract_names},
    error::ConnectError,
};

sol! {
    #[sol(rpc)]
    contract L2OutputOracle {
        struct OutputProposal {
            bytes32 outputRoot;
            uint128 timestamp;
            uint128 l2BlockNumber;
        }

        function latestBlockNumber() external view returns (uint256);
        function getL2OutputIndexAfter(uint256 l2BlockNumber) external view returns (uint256);
        function getL2Output(uint256 l2OutputIndex) external view returns (OutputProposal memory);
    }

    #[sol(rpc)]
    contract L2ToL1MessagePasser {
        function initiateWithdrawal(address target, uint256 gasLimit, bytes memory data) external payable;
    }

    #[sol(rpc)]
    contract OptimismPortal {
        function depositTransaction(
            address to,
            uint256 value,
            uint64 gasLimit,
            bool isCreation,
            bytes memory data
        ) external payable;
    }
}

/// L1 data-fee estimation on an op-stack L2
#[derive(Clone, Copy, Debug)]
pub struct L2PublicActions<'a> {
    client: &'a PublicClient,
}

impl<'a> L2PublicActions<'a> {
    pub(crate) fn new(client: &'a PublicClient) -> Self {
        Self { client }
    }

    /// L1 gas the serialized, unsigned transaction will be charged for
    pub async fn estimate_l1_gas(
        &self,
        unsigned_tx: Bytes,
        params: GasPriceOracleParameters,
    ) -> Result<U256, alloy::contract::Error> {
        let address = gas_price_oracle_address(self.client.chain(), &params);
        GasPriceOracle::new(address, self.client.provider())
            .getL1GasUsed(unsigned_tx)
            .call()
            .await
    }

    /// L1 data fee (in wei) for the serialized, unsigned transaction
    pub async fn estimate_l1_fee(
        &self,
        unsigned_tx: Bytes,
        params: GasPriceOracleParameters,
    ) -> Result<U256, alloy::contract::Error> {
        let address = gas_price_oracle_address(self.client.chain(), &params);
        GasPriceOracle::new(address, self.client.provider())
            .getL1Fee(unsigned_tx)
            .call()
            .await
    }

    /// L1 data fee plus L2 execution cost (`gas * gasPrice`), in wei
    pub async fn estimate_total_fee(
        &self,
        request: TransactionRequest,
        unsigned_tx: Bytes,
        params: GasPriceOracleParameters,
    ) -> Result<U256, ConnectError> {
        let l1_fee = self.estimate_l1_fee(unsigned_tx, params).await?;
        let provider = self.client.provider();
        let gas = provider.estimate_gas(request).await?;
        let gas_price = provider.get_gas_price().await?;

        let l2_fee = U256::from(gas) * U256::from(gas_price);
        tracing::debug!(%l1_fee, %l2_fee, gas, "Estimated total fee");

        Ok(l1_fee + l2_fee)
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

#[derive(Clone, Debug, Default)]
pub struct L2OutputOracleParameters {
    /// Oracle address; falls back to the chain's `l2OutputOracle` contract
    pub l2_output_oracle_address: Option<Address>,
}

/// A proposed L2 output root
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct L2Output {
    pub output_index: U256,
    pub output_root: B256,
    pub timestamp: u128,
    pub l2_block_number: u128,
}

/// Reads against the L1 contracts securing an op-stack L2
#[derive(Clone, Copy, Debug)]
pub struct L1PublicActions<'a> {
    client: &'a PublicClient,
}

impl<'a> L1PublicActions<'a> {
    pub(crate) fn new(client: &'a PublicClient) -> Self {
        Self { client }
    }

    fn oracle_address(&self, params: &L2OutputOracleParameters) -> Result<Address, ConnectError> {
        params
            .l2_output_oracle_address
            .or_else(|| {
                self.client
                    .chain()
                    .contract_address(contract_names::L2_OUTPUT_ORACLE)
            })
            .ok_or_else(|| {
                ConnectError::validation(format!(
                    "chain {} has no {} contract and none was given",
                    self.client.chain().chain_id,
                    contract_names::L2_OUTPUT_ORACLE
                ))
            })
    }

    pub async fn latest_l2_block_number(
        &self,
        params: L2OutputOracleParameters,
    ) -> Result<U256, ConnectError> {
        let oracle = L2OutputOracle::new(self.oracle_address(&params)?, self.client.provider());
        Ok(oracle.latestBlockNumber().call().await?)
    }

    /// First output proposal covering `l2_block_number`
    pub async fn get_l2_output(
        &self,
        l2_block_number: U256,
        params: L2OutputOracleParameters,
    ) -> Result<L2Output, ConnectError> {
        let oracle = L2OutputOracle::new(self.oracle_address(&params)?, self.client.provider());

        let output_index = oracle
            .getL2OutputIndexAfter(l2_block_number)
            .call()
            .await?;
        let proposal = oracle.getL2Output(output_index).call().await?;

        Ok(L2Output {
            output_index,
            output_root: proposal.outputRoot,
            timestamp: proposal.timestamp,
            l2_block_number: proposal.l2BlockNumber,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct InitiateWithdrawal {
    /// Recipient on L1
    pub target: Address,
    /// Gas limit for the L1 leg
    pub gas_limit: U256,
    pub data: Bytes,
    /// Amount of ETH withdrawn
    pub value: U256,
}

/// Writes on an op-stack L2
#[derive(Clone, Copy, Debug)]
pub struct L2WalletActions<'a> {
    client: &'a WalletClient,
}

impl<'a> L2WalletActions<'a> {
    pub(crate) fn new(client: &'a WalletClient) -> Self {
        Self { client }
    }

    pub async fn initiate_withdrawal(
        &self,
        withdrawal: InitiateWithdrawal,
    ) -> Result<TxHash, ConnectError> {
        let passer = self
            .client
            .chain()
            .contract_address(contract_names::L2_TO_L1_MESSAGE_PASSER)
            .unwrap_or(OP_STACK_L2_TO_L1_MESSAGE_PASSER);

        let pending = L2ToL1MessagePasser::new(passer, self.client.provider())
            .initiateWithdrawal(withdrawal.target, withdrawal.gas_limit, withdrawal.data)
            .from(self.client.account())
            .value(withdrawal.value)
            .send()
            .await?;

        tracing::debug!(
            tx_hash = ?pending.tx_hash(),
            target = ?withdrawal.target,
            "Initiated withdrawal"
        );
        Ok(*pending.tx_hash())
    }
}

#[derive(Clone, Debug, Default)]
pub struct DepositTransaction {
    /// Portal address; falls back to the chain's `portal` contract
    pub portal: Option<Address>,
    /// Recipient on L2
    pub to: Address,
    /// Value transferred on L2
    pub value: U256,
    /// ETH locked on L1 and minted on L2
    pub mint: U256,
    pub gas_limit: u64,
    pub is_creation: bool,
    pub data: Bytes,
}

/// Writes on the L1 side of an op-stack L2
#[derive(Clone, Copy, Debug)]
pub struct L1WalletActions<'a> {
    client: &'a WalletClient,
}

impl<'a> L1WalletActions<'a> {
    pub(crate) fn new(client: &'a WalletClient) -> Self {
        Self { client }
    }

    pub async fn deposit_transaction(
        &self,
        deposit: DepositTransaction,
    ) -> Result<TxHash, ConnectError> {
        let portal = deposit
            .portal
            .or_else(|| self.client.chain().contract_address(contract_names::PORTAL))
            .ok_or_else(|| {
                ConnectError::validation(format!(
                    "chain {} has no {} contract and none was given",
                    self.client.chain().chain_id,
                    contract_names::PORTAL
                ))
            })?;

        let pending = OptimismPortal::new(portal, self.client.provider())
            .depositTransaction(
                deposit.to,
                deposit.value,
                deposit.gas_limit,
                deposit.is_creation,
                deposit.data,
            )
            .from(self.client.account())
            .value(deposit.mint)
            .send()
            .await?;

        tracing::debug!(tx_hash = ?pending.tx_hash(), portal = ?portal, "Sent deposit transaction");
        Ok(*pending.tx_hash())
    }
}
