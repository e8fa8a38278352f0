use std::future::Future;

use alloy::transports::BoxTransport;
use connect_core::{
    chain::resolve_chain,
    error::ConnectError,
    transport::{HeaderInjectingTransport, RpcCredentials, SharedClientTransportBuilder},
};

use crate::{
    config::ConnectionConfig,
    state::{AccountState, ConnectedState, Connection, ExecutionPolicy, NetworkState},
};

/// A connection to a JSON-RPC node over HTTP
#[derive(Clone, Debug)]
pub struct HttpConnection {
    transport: HeaderInjectingTransport,
}

impl HttpConnection {
    pub fn new(transport: HeaderInjectingTransport) -> Self {
        Self { transport }
    }

    /// Connects to the configured RPC and derives the account and network
    /// state from the same configuration
    pub fn from_config(
        config: &ConnectionConfig,
    ) -> Result<ConnectedState<HttpConnection>, ConnectError> {
        let credentials = RpcCredentials {
            client_id: config.rpc.client_id.clone(),
            secret_key: config.rpc.secret_key.clone(),
        };
        let transport = SharedClientTransportBuilder::with_new_client()?
            .with_credentials(&config.rpc.url, &credentials)?;

        let chain_info = config.network.chain.clone();
        let chain_id = resolve_chain(&chain_info).numeric_id().ok_or_else(|| {
            ConnectError::validation(format!(
                "configured chain id {:?} is not a number",
                chain_info.chain_id
            ))
        })?;

        let network = NetworkState {
            chain_id,
            chain_info,
            contracts: config.network.contracts.clone(),
        };

        Ok(ConnectedState {
            connection: Self::new(transport),
            account: AccountState {
                address: config.account,
            },
            network,
        })
    }

    pub fn transport(&self) -> &HeaderInjectingTransport {
        &self.transport
    }
}

impl Connection for HttpConnection {
    fn provider(&self) -> BoxTransport {
        self.transport.clone().into_box()
    }
}

/// Runs every callback straight away, without asking anyone.
///
/// A policy with no connected state declines every callback.
#[derive(Clone, Debug)]
pub struct ImmediateExecution<C> {
    state: Option<ConnectedState<C>>,
}

impl<C> ImmediateExecution<C> {
    pub fn new(state: ConnectedState<C>) -> Self {
        Self { state: Some(state) }
    }

    pub fn disconnected() -> Self {
        Self { state: None }
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_some()
    }
}

impl ImmediateExecution<HttpConnection> {
    pub fn from_config(config: &ConnectionConfig) -> Result<Self, ConnectError> {
        HttpConnection::from_config(config).map(Self::new)
    }
}

impl<C> ExecutionPolicy for ImmediateExecution<C>
where
    C: Connection + Clone,
{
    type Connection = C;

    async fn execute<T, F, Fut>(&self, callback: F) -> Result<Option<T>, ConnectError>
    where
        T: Send,
        F: FnOnce(ConnectedState<C>) -> Fut + Send,
        Fut: Future<Output = Result<T, ConnectError>> + Send,
    {
        let Some(state) = self.state.clone() else {
            tracing::debug!("Not connected, declining to execute");
            return Ok(None);
        };

        callback(state).await.map(Some)
    }
}
