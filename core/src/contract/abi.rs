use std::collections::BTreeSet;

use alloy::{
    dyn_abi::{DynSolValue, JsonAbiExt, Specifier},
    json_abi::{AbiItem, Function, JsonAbi, Param, StateMutability},
    primitives::{Address, Bytes},
};
use serde_json::Value as JsonValue;

use crate::error::{ConnectError, ContractPreparationErrorKind};

/// What kinds of entries an ABI carries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AbiCapabilities {
    /// At least one `view` or `pure` function
    pub has_read: bool,
    /// At least one `nonpayable` or `payable` function
    pub has_write: bool,
    pub has_events: bool,
}

impl AbiCapabilities {
    /// Single pass over the ABI items, stopping once all three kinds are seen
    pub fn scan(abi: &JsonAbi) -> Self {
        let mut capabilities = Self::default();

        for item in abi.items() {
            match item {
                AbiItem::Function(function) if is_read_only(function.state_mutability) => {
                    capabilities.has_read = true;
                }
                AbiItem::Function(_) => capabilities.has_write = true,
                AbiItem::Event(_) => capabilities.has_events = true,
                _ => {}
            }
            if capabilities.is_complete() {
                break;
            }
        }

        capabilities
    }

    fn is_complete(&self) -> bool {
        self.has_read && self.has_write && self.has_events
    }
}

pub fn is_read_only(state_mutability: StateMutability) -> bool {
    matches!(state_mutability, StateMutability::View | StateMutability::Pure)
}

/// Names of all state-mutating functions, overloads collapsed
pub fn write_function_names(abi: &JsonAbi) -> BTreeSet<String> {
    abi.functions()
        .filter(|function| !is_read_only(function.state_mutability))
        .map(|function| function.name.clone())
        .collect()
}

fn json_to_sol(json_values: &[JsonValue], params: &[Param]) -> Result<Vec<DynSolValue>, String> {
    if json_values.len() != params.len() {
        return Err(format!(
            "Parameter count mismatch: expected {}, got {}",
            params.len(),
            json_values.len()
        ));
    }

    json_values
        .iter()
        .zip(params)
        .map(|(json_value, param)| {
            let sol_type = param
                .resolve()
                .map_err(|e| format!("Invalid Solidity type '{}': {e}", param.ty))?;

            let value = sol_type
                .coerce_json(json_value)
                .map_err(|e| format!("Failed to parse parameter '{}' as {}: {e}", param.name, param.ty))?;

            if !value.matches(&sol_type) {
                return Err(format!(
                    "Parameter type mismatch: expected {}, got {:?}",
                    param.ty,
                    value.as_type()
                ));
            }

            Ok(value)
        })
        .collect()
}

fn encode_input(function: &Function, args: &[JsonValue]) -> Result<Vec<u8>, String> {
    let values = json_to_sol(args, &function.inputs)?;
    function
        .abi_encode_input(&values)
        .map_err(|e| format!("Failed to encode function call: {e}"))
}

/// Resolves `function_name` (overloads disambiguated by argument count, then by
/// which one accepts the arguments) and returns the encoded calldata
pub fn encode_function_call(
    abi: &JsonAbi,
    contract_address: Address,
    function_name: &str,
    args: &[JsonValue],
) -> Result<Bytes, ConnectError> {
    let preparation_error =
        |kind| ConnectError::contract_preparation_error(Some(contract_address), kind);

    let overloads = abi.function(function_name).ok_or_else(|| {
        preparation_error(ContractPreparationErrorKind::UnknownFunction {
            function_name: function_name.to_string(),
        })
    })?;

    let candidates: Vec<&Function> = overloads
        .iter()
        .filter(|function| function.inputs.len() == args.len())
        .collect();

    let mut last_error = None;
    for function in &candidates {
        match encode_input(function, args) {
            Ok(call_data) => return Ok(call_data.into()),
            Err(e) => last_error = Some(e),
        }
    }

    Err(match last_error {
        Some(message) if candidates.len() == 1 => {
            preparation_error(ContractPreparationErrorKind::ParameterEncoding { message })
        }
        Some(_) => preparation_error(ContractPreparationErrorKind::ParameterEncoding {
            message: format!(
                "No overload of '{function_name}' could encode the provided parameters"
            ),
        }),
        None => preparation_error(ContractPreparationErrorKind::NoMatchingOverload {
            function_name: function_name.to_string(),
            arg_count: args.len(),
        }),
    })
}
