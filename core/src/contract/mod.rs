//! Contract handles over the composed client pair

pub mod abi;
pub mod estimate;

use std::sync::Arc;

use alloy::{json_abi::JsonAbi, primitives::Address};
use serde::{Deserialize, Serialize};

use crate::client::ClientPair;

pub use abi::{AbiCapabilities, encode_function_call, write_function_names};
pub use estimate::{
    EstimateOptions, FeeEstimators, FunctionEstimator, FunctionParameters,
    parse_function_parameters,
};

/// A configured contract: its ABI and where it lives
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContractSpec {
    pub abi: JsonAbi,
    pub address: Address,
}

#[derive(Clone, Debug)]
pub struct ContractHandle {
    address: Address,
    abi: Arc<JsonAbi>,
    estimate_all_fees: Option<FeeEstimators>,
}

impl ContractHandle {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    /// Per-write-function gas estimators; `None` when the ABI has no write
    /// functions or there is no client to estimate with
    pub fn estimate_all_fees(&self) -> Option<&FeeEstimators> {
        self.estimate_all_fees.as_ref()
    }
}

pub fn wrap_contract(spec: &ContractSpec, clients: Arc<ClientPair>) -> ContractHandle {
    let capabilities = AbiCapabilities::scan(&spec.abi);
    let abi = Arc::new(spec.abi.clone());

    let estimate_all_fees = (capabilities.has_write && !clients.is_empty()).then(|| {
        FeeEstimators::from_functions(
            write_function_names(&abi),
            spec.address,
            abi.clone(),
            clients,
        )
    });

    tracing::debug!(
        address = ?spec.address,
        has_read = capabilities.has_read,
        has_write = capabilities.has_write,
        has_events = capabilities.has_events,
        estimators = estimate_all_fees.as_ref().map_or(0, FeeEstimators::len),
        "Wrapped contract"
    );

    ContractHandle {
        address: spec.address,
        abi,
        estimate_all_fees,
    }
}
