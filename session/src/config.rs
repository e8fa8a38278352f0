use std::{collections::BTreeMap, env, path::Path};

use alloy::primitives::Address;
use config::{Config, File};
use connect_core::{chain::ChainDescriptor, contract::ContractSpec, error::ConnectError};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    pub rpc: RpcSettings,
    pub account: Address,
    pub network: NetworkSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcSettings {
    pub url: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkSettings {
    pub chain: ChainDescriptor,
    /// Contract name to inline JSON ABI and address
    #[serde(default)]
    pub contracts: BTreeMap<String, ContractSpec>,
}

/// Loads `configuration/` relative to the working directory, for the
/// environment named by `APP_ENVIRONMENT` (default `local`)
pub fn get_config() -> Result<ConnectionConfig, ConnectError> {
    let base_path = env::current_dir().map_err(|e| ConnectError::Config {
        message: format!("Failed to determine the current directory: {e}"),
    })?;

    // Detect the running environment
    let environment: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(|message| ConnectError::Config { message })?;

    load_config(&base_path.join("configuration"), environment)
}

/// Layers `connection_base.yaml`, `connection_{environment}.yaml` and `APP__`
/// prefixed environment variables, later sources winning
pub fn load_config(
    configuration_directory: &Path,
    environment: Environment,
) -> Result<ConnectionConfig, ConnectError> {
    let environment_filename = format!("connection_{}.yaml", environment.as_str());

    let config = Config::builder()
        .add_source(File::from(configuration_directory.join("connection_base.yaml")))
        .add_source(File::from(configuration_directory.join(environment_filename)).required(false))
        .add_source(config::Environment::with_prefix("app").separator("__"))
        .build()
        .map_err(|e| ConnectError::Config {
            message: format!("Failed to build configuration: {e}"),
        })?;

    let config = config
        .try_deserialize::<ConnectionConfig>()
        .map_err(|e| ConnectError::Config {
            message: format!("Failed to deserialize configuration: {e}"),
        })?;

    tracing::debug!(
        environment = environment.as_str(),
        chain_id = %config.network.chain.chain_id,
        contracts = config.network.contracts.len(),
        "Loaded connection configuration"
    );

    Ok(config)
}

/// The possible runtime environment for our application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Local,
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local`, `development`, or `production`."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::try_from("Production".to_string()),
            Ok(Environment::Production)
        );
        assert_eq!(Environment::try_from("local".to_string()), Ok(Environment::Local));
        assert!(Environment::try_from("staging".to_string()).is_err());
    }

    #[test]
    fn test_missing_base_file() {
        let result = load_config(Path::new("/nonexistent/configuration"), Environment::Local);
        assert!(matches!(result, Err(ConnectError::Config { .. })));
    }
}
