use std::{collections::BTreeMap, future::Future, sync::Arc};

use alloy::transports::BoxTransport;
use connect_core::{
    chain::resolve_chain,
    client::{ClientPair, compose_clients},
    contract::{ContractHandle, wrap_contract},
    error::ConnectError,
};

use crate::state::{AccountState, ConnectedState, Connection, ExecutionPolicy, NetworkState};

/// The fully wired state handed to an `execute` callback
#[derive(Clone, Debug)]
pub struct SessionBundle<C> {
    pub connection: C,
    pub account: AccountState,
    pub network: NetworkState,
    pub client: Arc<ClientPair>,
    pub contracts: BTreeMap<String, ContractHandle>,
}

impl<C> SessionBundle<C> {
    pub fn contract(&self, name: &str) -> Option<&ContractHandle> {
        self.contracts.get(name)
    }
}

/// Resolves the chain, composes the client pair over `provider_override` (or
/// the connection's own transport) and wraps every configured contract
pub fn build_session<C: Connection>(
    connection: C,
    account: AccountState,
    network: NetworkState,
    provider_override: Option<BoxTransport>,
) -> SessionBundle<C> {
    let descriptor = network.chain_descriptor();
    let family = descriptor.chain_type;
    let chain = resolve_chain(&descriptor);

    let transport = provider_override.unwrap_or_else(|| connection.provider());
    let client = Arc::new(compose_clients(transport, chain, account.address, family));

    let contracts: BTreeMap<String, ContractHandle> = network
        .contracts
        .iter()
        .map(|(name, spec)| (name.clone(), wrap_contract(spec, client.clone())))
        .collect();

    tracing::debug!(
        chain_id = %descriptor.chain_id,
        ?family,
        account = ?account.address,
        contracts = contracts.len(),
        "Built session"
    );

    SessionBundle {
        connection,
        account,
        network,
        client,
        contracts,
    }
}

/// Runs callbacks against a freshly built session, under an execution policy
pub struct SessionComposer<P> {
    policy: P,
    provider_override: Option<BoxTransport>,
}

impl<P: ExecutionPolicy> SessionComposer<P> {
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            provider_override: None,
        }
    }

    /// Route every session through `transport` instead of the connection's own
    pub fn with_provider_override(mut self, transport: BoxTransport) -> Self {
        self.provider_override = Some(transport);
        self
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// `Ok(None)` when the policy declined to run; otherwise whatever the
    /// callback produced
    pub async fn execute<T, F, Fut>(&self, callback: F) -> Result<Option<T>, ConnectError>
    where
        T: Send,
        F: FnOnce(SessionBundle<P::Connection>) -> Fut + Send,
        Fut: Future<Output = Result<T, ConnectError>> + Send,
    {
        let provider_override = self.provider_override.clone();

        self.policy
            .execute(move |state: ConnectedState<P::Connection>| async move {
                let session = build_session(
                    state.connection,
                    state.account,
                    state.network,
                    provider_override,
                );
                callback(session).await
            })
            .await
    }
}
