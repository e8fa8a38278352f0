use std::{collections::BTreeMap, sync::Arc};

use alloy::{
    json_abi::JsonAbi,
    network::TransactionBuilder,
    primitives::{Address, U256},
    providers::Provider,
    rpc::types::{BlockId, TransactionRequest},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::{
    chain::ChainConfig,
    client::{ClientPair, WalletClient},
    contract::abi::encode_function_call,
    error::ConnectError,
};

/// Positional arguments and call options split out of a raw parameter list
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FunctionParameters {
    pub args: Vec<JsonValue>,
    pub options: JsonMap<String, JsonValue>,
}

/// Accepts both `(args, options?)` and `(options?)`.
///
/// A leading array is the argument list and the value after it the options;
/// otherwise the first value is the options and there are no arguments.
pub fn parse_function_parameters(values: &[JsonValue]) -> Result<FunctionParameters, ConnectError> {
    let (args, options) = match values.first() {
        Some(JsonValue::Array(args)) => (args.clone(), values.get(1)),
        _ => (Vec::new(), values.first()),
    };

    let options = match options {
        None | Some(JsonValue::Null) => JsonMap::new(),
        Some(JsonValue::Object(options)) => options.clone(),
        Some(other) => {
            return Err(ConnectError::validation(format!(
                "call options must be an object, got {other}"
            )));
        }
    };

    Ok(FunctionParameters { args, options })
}

/// Call options; unknown keys are rejected
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EstimateOptions {
    /// Sender; defaults to the write client's account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<u128>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<u128>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<u128>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<BlockId>,
    /// Chain the caller targets; estimation always runs on the client's chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<ChainConfig>,
}

impl EstimateOptions {
    pub fn from_map(options: JsonMap<String, JsonValue>) -> Result<Self, ConnectError> {
        serde_json::from_value(JsonValue::Object(options))
            .map_err(|e| ConnectError::validation(format!("invalid call options: {e}")))
    }

    fn apply(&self, mut request: TransactionRequest) -> TransactionRequest {
        if let Some(value) = self.value {
            request = request.with_value(value);
        }
        if let Some(gas) = self.gas {
            request = request.with_gas_limit(gas);
        }
        if let Some(gas_price) = self.gas_price {
            request = request.with_gas_price(gas_price);
        }
        if let Some(max_fee_per_gas) = self.max_fee_per_gas {
            request = request.with_max_fee_per_gas(max_fee_per_gas);
        }
        if let Some(max_priority_fee_per_gas) = self.max_priority_fee_per_gas {
            request = request.with_max_priority_fee_per_gas(max_priority_fee_per_gas);
        }
        if let Some(nonce) = self.nonce {
            request = request.with_nonce(nonce);
        }
        request
    }
}

/// Gas estimator for one write function of a contract
#[derive(Clone, Debug)]
pub struct FunctionEstimator {
    function_name: String,
    address: Address,
    abi: Arc<JsonAbi>,
    clients: Arc<ClientPair>,
}

impl FunctionEstimator {
    pub(crate) fn new(
        function_name: String,
        address: Address,
        abi: Arc<JsonAbi>,
        clients: Arc<ClientPair>,
    ) -> Self {
        Self {
            function_name,
            address,
            abi,
            clients,
        }
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Estimates from a raw parameter list, see [`parse_function_parameters`]
    pub async fn estimate(&self, values: &[JsonValue]) -> Result<u64, ConnectError> {
        let FunctionParameters { args, options } = parse_function_parameters(values)?;
        let options = EstimateOptions::from_map(options)?;
        self.estimate_with(&args, options).await
    }

    pub async fn estimate_with(
        &self,
        args: &[JsonValue],
        options: EstimateOptions,
    ) -> Result<u64, ConnectError> {
        let call_data = encode_function_call(&self.abi, self.address, &self.function_name, args)?;

        let write = self.clients.write.as_ref();
        let provider = match (write, self.clients.read.as_ref()) {
            (Some(write), _) => write.provider(),
            (None, Some(read)) => read.provider(),
            (None, None) => {
                return Err(ConnectError::validation(format!(
                    "no client available to estimate {}",
                    self.function_name
                )));
            }
        };

        let account = options.account.or_else(|| write.map(WalletClient::account));

        let mut request = TransactionRequest::default()
            .with_to(self.address)
            .with_input(call_data);
        if let Some(account) = account {
            request = request.with_from(account);
        }
        let request = options.apply(request);

        tracing::debug!(
            contract = ?self.address,
            function = %self.function_name,
            from = ?account,
            chain_hint = ?options.chain.as_ref().map(|chain| &chain.chain_id),
            "Estimating gas"
        );

        let mut call = provider.estimate_gas(request);
        if let Some(block) = options.block {
            call = call.block(block);
        }

        Ok(call.await?)
    }
}

/// Write-function name to its estimator
#[derive(Clone, Debug, Default)]
pub struct FeeEstimators {
    estimators: BTreeMap<String, FunctionEstimator>,
}

impl FeeEstimators {
    pub(crate) fn from_functions(
        function_names: impl IntoIterator<Item = String>,
        address: Address,
        abi: Arc<JsonAbi>,
        clients: Arc<ClientPair>,
    ) -> Self {
        let estimators = function_names
            .into_iter()
            .map(|name| {
                let estimator =
                    FunctionEstimator::new(name.clone(), address, abi.clone(), clients.clone());
                (name, estimator)
            })
            .collect();
        Self { estimators }
    }

    pub fn get(&self, function_name: &str) -> Option<&FunctionEstimator> {
        self.estimators.get(function_name)
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.estimators.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FunctionEstimator)> {
        self.estimators
            .iter()
            .map(|(name, estimator)| (name.as_str(), estimator))
    }

    pub fn len(&self) -> usize {
        self.estimators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estimators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use serde_json::json;

    #[test]
    fn test_args_then_options() {
        let parsed = parse_function_parameters(&[json!(["a", "b"]), json!({ "value": 5 })]).unwrap();

        assert_eq!(parsed.args, vec![json!("a"), json!("b")]);
        assert_eq!(parsed.options.get("value"), Some(&json!(5)));
    }

    #[test]
    fn test_options_only() {
        let parsed = parse_function_parameters(&[json!({ "value": 5 })]).unwrap();

        assert!(parsed.args.is_empty());
        assert_eq!(parsed.options.get("value"), Some(&json!(5)));
    }

    #[test]
    fn test_no_parameters() {
        let parsed = parse_function_parameters(&[]).unwrap();
        assert_eq!(parsed, FunctionParameters::default());

        let parsed = parse_function_parameters(&[json!([]), JsonValue::Null]).unwrap();
        assert_eq!(parsed, FunctionParameters::default());
    }

    #[test]
    fn test_non_object_options_rejected() {
        let err = parse_function_parameters(&[json!([1]), json!("fast")]).unwrap_err();
        assert!(matches!(err, ConnectError::Validation { .. }));

        let err = parse_function_parameters(&[json!(7)]).unwrap_err();
        assert!(matches!(err, ConnectError::Validation { .. }));
    }

    #[test]
    fn test_typed_options() {
        let parsed = parse_function_parameters(&[json!({
            "account": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
            "value": "0x5",
            "gas": 21000,
            "maxFeePerGas": 30000000000u64,
            "block": "latest"
        })])
        .unwrap();

        let options = EstimateOptions::from_map(parsed.options).unwrap();
        assert_eq!(
            options.account,
            Some(address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8"))
        );
        assert_eq!(options.value, Some(U256::from(5)));
        assert_eq!(options.gas, Some(21000));
        assert_eq!(options.max_fee_per_gas, Some(30_000_000_000));
        assert_eq!(options.block, Some(BlockId::latest()));
        assert_eq!(options.nonce, None);
    }

    #[test]
    fn test_unknown_option_keys_rejected() {
        let parsed =
            parse_function_parameters(&[json!({ "gasLimit": 21000, "valeu": 5 })]).unwrap();
        let err = EstimateOptions::from_map(parsed.options).unwrap_err();
        assert!(matches!(err, ConnectError::Validation { .. }));

        let parsed = parse_function_parameters(&[json!([]), json!({ "valeu": "0x5" })]).unwrap();
        match EstimateOptions::from_map(parsed.options) {
            Err(ConnectError::Validation { message }) => assert!(message.contains("valeu")),
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_chain_option_accepted() {
        use crate::chain::{ChainDescriptor, ChainFamily, resolve_chain};

        let chain = resolve_chain(&ChainDescriptor {
            chain_type: ChainFamily::OpStack,
            chain_id: "10".to_string(),
            ..Default::default()
        });
        let mut options = JsonMap::new();
        options.insert("chain".to_string(), serde_json::to_value(&chain).unwrap());
        options.insert("gas".to_string(), json!(50_000));

        let options = EstimateOptions::from_map(options).unwrap();
        assert_eq!(options.chain, Some(chain));
        assert_eq!(options.gas, Some(50_000));
    }
}
