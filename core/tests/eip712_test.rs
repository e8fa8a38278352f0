use fixtures::*;

use alloy::primitives::{Bytes, U256, address};
use connect_core::{actions::eip712::Eip712Transaction, chain::ChainFamily, error::ConnectError};

fn transfer() -> Eip712Transaction {
    Eip712Transaction {
        to: address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8"),
        gas_limit: U256::from(500_000u64),
        max_fee_per_gas: U256::from(250_000_000u64),
        value: U256::from(1u64),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_sign_transaction_returns_wallet_signature() {
    setup_tracing();
    let (asserter, pair) = mock_pair_for(&descriptor(ChainFamily::ZkSync, "324"));
    let signature = Bytes::from(vec![0x11; 65]);
    asserter.push_success(&signature);

    let write = pair.write.as_ref().unwrap();
    let signed = write.eip712().unwrap().sign_transaction(&transfer()).await.unwrap();

    assert_eq!(signed, signature);
}

#[tokio::test]
async fn test_sign_transaction_needs_numeric_chain_id() {
    let (_asserter, pair) = mock_pair_for(&descriptor(ChainFamily::ZkSync, "zksync-era"));
    let write = pair.write.as_ref().unwrap();

    let err = write
        .eip712()
        .unwrap()
        .sign_transaction(&transfer())
        .await
        .unwrap_err();

    assert!(matches!(err, ConnectError::Validation { .. }));
}

#[tokio::test]
async fn test_op_stack_has_no_eip712() {
    let (_asserter, pair) = mock_pair(ChainFamily::OpStack);
    assert!(pair.write.as_ref().unwrap().eip712().is_none());
}
