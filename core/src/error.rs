use alloy::{
    primitives::Address,
    transports::{TransportError, http::reqwest::header::InvalidHeaderValue},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a contract call could not be prepared locally, before anything was sent
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractPreparationErrorKind {
    /// Unknown function referenced.
    #[error("unknown function: function {function_name} does not exist")]
    UnknownFunction {
        #[serde(rename = "functionName")]
        function_name: String,
    },

    /// Function exists, but no overload takes the given number of arguments.
    #[error("no overload of {function_name} takes {arg_count} arguments")]
    NoMatchingOverload {
        #[serde(rename = "functionName")]
        function_name: String,
        #[serde(rename = "argCount")]
        arg_count: usize,
    },

    /// Arguments could not be coerced into the function's input types.
    #[error("parameter encoding failed: {message}")]
    ParameterEncoding { message: String },
}

#[derive(Error, Debug)]
pub enum ConnectError {
    /// Failure raised by the RPC transport, passed through untouched.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Failure raised by an alloy contract call, passed through untouched.
    #[error(transparent)]
    Contract(#[from] alloy::contract::Error),

    #[error("Contract preparation error: {message}")]
    ContractPreparation {
        contract_address: Option<Address>,
        message: String,
        kind: ContractPreparationErrorKind,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Bad RPC configuration: {message}")]
    RpcConfig { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Callback failed: {message}")]
    Callback { message: String },
}

impl From<InvalidHeaderValue> for ConnectError {
    fn from(err: InvalidHeaderValue) -> Self {
        ConnectError::RpcConfig {
            message: err.to_string(),
        }
    }
}

impl ConnectError {
    pub fn contract_preparation_error(
        contract_address: Option<Address>,
        kind: ContractPreparationErrorKind,
    ) -> Self {
        ConnectError::ContractPreparation {
            contract_address,
            message: kind.to_string(),
            kind,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ConnectError::Validation {
            message: message.into(),
        }
    }

    pub fn callback(error: impl std::fmt::Display) -> Self {
        ConnectError::Callback {
            message: error.to_string(),
        }
    }
}
