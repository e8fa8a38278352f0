use std::sync::Arc;

use alloy::{
    primitives::Address,
    providers::RootProvider,
    rpc::client::RpcClient,
    transports::BoxTransport,
};

use crate::{
    actions::{
        eip712::Eip712WalletActions,
        gas_oracle::GasOracleActions,
        op_stack::{L1PublicActions, L1WalletActions, L2PublicActions, L2WalletActions},
    },
    chain::{ChainConfig, ChainFamily},
};

/// Method sets that can be layered onto a [`PublicClient`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublicActions {
    /// op-stack L2 reads (L1 fee estimation)
    L2,
    /// op-stack L1 reads (L2 output proposals)
    L1,
    /// `getL1BaseFee` / `getL1FeeScalar` against the gas price oracle
    GasOracle,
}

/// Method sets that can be layered onto a [`WalletClient`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalletActions {
    /// op-stack L2 writes (withdrawal initiation)
    L2,
    /// op-stack L1 writes (deposits through the portal)
    L1,
    /// zkSync EIP-712 typed-data signing
    Eip712,
}

/// Read-only client bound to a transport and a chain
#[derive(Clone, Debug)]
pub struct PublicClient {
    provider: RootProvider,
    chain: Arc<ChainConfig>,
    layers: Vec<PublicActions>,
}

impl PublicClient {
    pub fn new(transport: BoxTransport, chain: ChainConfig) -> Self {
        Self::from_provider(provider_for(transport), Arc::new(chain))
    }

    pub fn from_provider(provider: RootProvider, chain: Arc<ChainConfig>) -> Self {
        Self {
            provider,
            chain,
            layers: Vec::new(),
        }
    }

    pub fn provider(&self) -> &RootProvider {
        &self.provider
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    pub fn layers(&self) -> &[PublicActions] {
        &self.layers
    }

    pub fn has(&self, actions: PublicActions) -> bool {
        self.layers.contains(&actions)
    }

    /// Returns a new client carrying `actions` on top of everything this one has.
    ///
    /// `self` is left as it was, so earlier handles keep their method set.
    pub fn extend(&self, actions: PublicActions) -> Self {
        let mut extended = self.clone();
        if !extended.layers.contains(&actions) {
            extended.layers.push(actions);
        }
        extended
    }

    pub fn gas_oracle(&self) -> Option<GasOracleActions<'_>> {
        self.has(PublicActions::GasOracle)
            .then(|| GasOracleActions::new(self))
    }

    pub fn l2(&self) -> Option<L2PublicActions<'_>> {
        self.has(PublicActions::L2).then(|| L2PublicActions::new(self))
    }

    pub fn l1(&self) -> Option<L1PublicActions<'_>> {
        self.has(PublicActions::L1).then(|| L1PublicActions::new(self))
    }
}

/// Client that sends state-changing requests on behalf of an account.
///
/// The account is only an address; signing happens behind the transport.
#[derive(Clone, Debug)]
pub struct WalletClient {
    provider: RootProvider,
    chain: Arc<ChainConfig>,
    account: Address,
    layers: Vec<WalletActions>,
}

impl WalletClient {
    pub fn new(transport: BoxTransport, chain: ChainConfig, account: Address) -> Self {
        Self::from_provider(provider_for(transport), Arc::new(chain), account)
    }

    pub fn from_provider(provider: RootProvider, chain: Arc<ChainConfig>, account: Address) -> Self {
        Self {
            provider,
            chain,
            account,
            layers: Vec::new(),
        }
    }

    pub fn provider(&self) -> &RootProvider {
        &self.provider
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn layers(&self) -> &[WalletActions] {
        &self.layers
    }

    pub fn has(&self, actions: WalletActions) -> bool {
        self.layers.contains(&actions)
    }

    pub fn extend(&self, actions: WalletActions) -> Self {
        let mut extended = self.clone();
        if !extended.layers.contains(&actions) {
            extended.layers.push(actions);
        }
        extended
    }

    pub fn l2(&self) -> Option<L2WalletActions<'_>> {
        self.has(WalletActions::L2).then(|| L2WalletActions::new(self))
    }

    pub fn l1(&self) -> Option<L1WalletActions<'_>> {
        self.has(WalletActions::L1).then(|| L1WalletActions::new(self))
    }

    pub fn eip712(&self) -> Option<Eip712WalletActions<'_>> {
        self.has(WalletActions::Eip712)
            .then(|| Eip712WalletActions::new(self))
    }
}

/// A read client and a write client; composed pairs always carry both
#[derive(Clone, Debug, Default)]
pub struct ClientPair {
    pub read: Option<PublicClient>,
    pub write: Option<WalletClient>,
}

impl ClientPair {
    pub fn new(read: PublicClient, write: WalletClient) -> Self {
        Self {
            read: Some(read),
            write: Some(write),
        }
    }

    pub fn read_only(read: PublicClient) -> Self {
        Self {
            read: Some(read),
            write: None,
        }
    }

    pub fn write_only(write: WalletClient) -> Self {
        Self {
            read: None,
            write: Some(write),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.read.is_none() && self.write.is_none()
    }
}

fn provider_for(transport: BoxTransport) -> RootProvider {
    RootProvider::new(RpcClient::builder().transport(transport, false))
}

fn layer_public(base: PublicClient, layers: &[PublicActions]) -> PublicClient {
    layers.iter().fold(base, |client, actions| client.extend(*actions))
}

fn layer_wallet(base: WalletClient, layers: &[WalletActions]) -> WalletClient {
    layers.iter().fold(base, |client, actions| client.extend(*actions))
}

/// Builds the read/write pair for a chain and layers on the family's method sets
pub fn compose_clients(
    transport: BoxTransport,
    chain: ChainConfig,
    account: Address,
    family: ChainFamily,
) -> ClientPair {
    let provider = provider_for(transport);
    let chain = Arc::new(chain);

    let read = PublicClient::from_provider(provider.clone(), chain.clone());
    let write = WalletClient::from_provider(provider, chain.clone(), account);

    let (read, write) = match family {
        ChainFamily::OpStack => (
            layer_public(
                read,
                &[PublicActions::L2, PublicActions::L1, PublicActions::GasOracle],
            ),
            layer_wallet(write, &[WalletActions::L2, WalletActions::L1]),
        ),
        ChainFamily::ZkSync => (read, layer_wallet(write, &[WalletActions::Eip712])),
        ChainFamily::Celo | ChainFamily::Other => (read, write),
    };

    tracing::debug!(
        chain_id = %chain.chain_id,
        ?family,
        account = ?account,
        read_layers = ?read.layers(),
        write_layers = ?write.layers(),
        "Composed client pair"
    );

    ClientPair::new(read, write)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{ChainDescriptor, resolve_chain};
    use alloy::{
        primitives::address,
        transports::mock::{Asserter, MockTransport},
    };

    const ACCOUNT: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    fn compose(family: ChainFamily) -> ClientPair {
        let chain = resolve_chain(&ChainDescriptor {
            chain_type: family,
            chain_id: "10".to_string(),
            ..Default::default()
        });
        let transport = BoxTransport::new(MockTransport::new(Asserter::new()));
        compose_clients(transport, chain, ACCOUNT, family)
    }

    #[test]
    fn test_op_stack_layers() {
        let pair = compose(ChainFamily::OpStack);
        let read = pair.read.as_ref().unwrap();
        let write = pair.write.as_ref().unwrap();

        assert_eq!(
            read.layers(),
            &[PublicActions::L2, PublicActions::L1, PublicActions::GasOracle]
        );
        assert_eq!(write.layers(), &[WalletActions::L2, WalletActions::L1]);
        assert!(read.gas_oracle().is_some());
        assert!(read.l2().is_some());
        assert!(read.l1().is_some());
        assert!(write.l2().is_some());
        assert!(write.l1().is_some());
        assert!(write.eip712().is_none());
        assert_eq!(write.account(), ACCOUNT);
    }

    #[test]
    fn test_zksync_layers_write_only() {
        let pair = compose(ChainFamily::ZkSync);
        let read = pair.read.as_ref().unwrap();
        let write = pair.write.as_ref().unwrap();

        assert!(read.layers().is_empty());
        assert_eq!(write.layers(), &[WalletActions::Eip712]);
        assert!(write.eip712().is_some());
    }

    #[test]
    fn test_celo_and_other_are_bare() {
        for family in [ChainFamily::Celo, ChainFamily::Other] {
            let pair = compose(family);
            let read = pair.read.as_ref().unwrap();
            let write = pair.write.as_ref().unwrap();

            assert!(read.gas_oracle().is_none());
            assert!(read.layers().is_empty());
            assert!(write.layers().is_empty());
        }
    }

    #[test]
    fn test_extend_leaves_original_untouched() {
        let pair = compose(ChainFamily::Celo);
        let base = pair.read.unwrap();

        let extended = base.extend(PublicActions::GasOracle);
        assert!(extended.gas_oracle().is_some());
        assert!(base.gas_oracle().is_none());

        // Extending twice with the same set is a no-op on the layer list
        let again = extended.extend(PublicActions::GasOracle);
        assert_eq!(again.layers(), &[PublicActions::GasOracle]);
    }
}
