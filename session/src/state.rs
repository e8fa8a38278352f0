//! What the connection library hands over: a transport, an account and a network

use std::{collections::BTreeMap, future::Future};

use alloy::{primitives::Address, transports::BoxTransport};
use connect_core::{chain::ChainDescriptor, contract::ContractSpec, error::ConnectError};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

/// A live connection to a wallet or node
pub trait Connection: Send + Sync {
    /// Request transport every client of a session is built on
    fn provider(&self) -> BoxTransport;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    pub address: Address,
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkState {
    /// Accepted as a number or a decimal string
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub chain_id: u64,
    pub chain_info: ChainDescriptor,
    #[serde(default)]
    pub contracts: BTreeMap<String, ContractSpec>,
}

impl NetworkState {
    /// The chain descriptor, with the network's chain id filled in when the
    /// descriptor did not carry one
    pub fn chain_descriptor(&self) -> ChainDescriptor {
        let mut descriptor = self.chain_info.clone();
        if descriptor.chain_id.trim().is_empty() {
            descriptor.chain_id = self.chain_id.to_string();
        }
        descriptor
    }
}

/// Everything an [`ExecutionPolicy`] passes on once it decides to run
#[derive(Clone, Debug)]
pub struct ConnectedState<C> {
    pub connection: C,
    pub account: AccountState,
    pub network: NetworkState,
}

/// The connection library's rules for when a callback may run (user
/// confirmation, network switching and so on).
///
/// Implementations resolve to `Ok(None)` when they decline to run the callback.
pub trait ExecutionPolicy: Send + Sync {
    type Connection: Connection;

    fn execute<T, F, Fut>(
        &self,
        callback: F,
    ) -> impl Future<Output = Result<Option<T>, ConnectError>> + Send
    where
        T: Send,
        F: FnOnce(ConnectedState<Self::Connection>) -> Fut + Send,
        Fut: Future<Output = Result<T, ConnectError>> + Send;
}
