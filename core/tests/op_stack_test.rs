use fixtures::*;

use alloy::primitives::{Address, B256, Bytes, U64, U128, U256, address, b256};
use connect_core::{
    actions::{
        gas_oracle::GasPriceOracleParameters,
        op_stack::{DepositTransaction, InitiateWithdrawal, L2OutputOracleParameters},
    },
    chain::{ChainContract, ChainFamily},
    constants::contract_names,
    error::ConnectError,
};

const OUTPUT_ORACLE: Address = address!("0xdfe97868233d1aa22e815a266982f2cf17685a27");

#[tokio::test]
async fn test_estimate_total_fee_adds_l1_and_l2_cost() {
    setup_tracing();
    let (asserter, pair) = mock_pair(ChainFamily::OpStack);
    // getL1Fee, eth_estimateGas, eth_gasPrice
    asserter.push_success(&uint_word(1_000));
    asserter.push_success(&U64::from(21_000));
    asserter.push_success(&U128::from(2));

    let read = pair.read.as_ref().unwrap();
    let total = read
        .l2()
        .unwrap()
        .estimate_total_fee(
            Default::default(),
            Bytes::from_static(&[0x02, 0xc0]),
            GasPriceOracleParameters::default(),
        )
        .await
        .unwrap();

    assert_eq!(total, U256::from(1_000 + 21_000 * 2));
}

#[tokio::test]
async fn test_l2_output_requires_oracle() {
    let (_asserter, pair) = mock_pair(ChainFamily::OpStack);
    let read = pair.read.as_ref().unwrap();

    let err = read
        .l1()
        .unwrap()
        .latest_l2_block_number(L2OutputOracleParameters::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ConnectError::Validation { .. }));
}

#[tokio::test]
async fn test_get_l2_output_from_chain_oracle() {
    setup_tracing();
    let mut chain = descriptor(ChainFamily::OpStack, "1");
    chain.contracts.insert(
        contract_names::L2_OUTPUT_ORACLE.to_string(),
        ChainContract::new(OUTPUT_ORACLE),
    );
    let (asserter, pair) = mock_pair_for(&chain);

    let output_root = b256!("0x4a7c1e0a6b9a1f4f0e2b9e4d1c7f3a5b6d8e9f0a1b2c3d4e5f60718293a4b5c6");
    let mut proposal = Vec::with_capacity(96);
    proposal.extend_from_slice(output_root.as_slice());
    proposal.extend_from_slice(&U256::from(1_700_000_000u64).to_be_bytes::<32>());
    proposal.extend_from_slice(&U256::from(120_000_000u64).to_be_bytes::<32>());

    // getL2OutputIndexAfter, then getL2Output
    asserter.push_success(&uint_word(9));
    asserter.push_success(&Bytes::from(proposal));

    let read = pair.read.as_ref().unwrap();
    let output = read
        .l1()
        .unwrap()
        .get_l2_output(U256::from(119_999_990u64), L2OutputOracleParameters::default())
        .await
        .unwrap();

    assert_eq!(output.output_index, U256::from(9));
    assert_eq!(output.output_root, output_root);
    assert_eq!(output.timestamp, 1_700_000_000);
    assert_eq!(output.l2_block_number, 120_000_000);
}

#[tokio::test]
async fn test_initiate_withdrawal_returns_hash() {
    setup_tracing();
    let (asserter, pair) = mock_pair(ChainFamily::OpStack);
    let tx_hash = B256::repeat_byte(0xab);
    asserter.push_success(&tx_hash);

    let write = pair.write.as_ref().unwrap();
    let sent = write
        .l2()
        .unwrap()
        .initiate_withdrawal(InitiateWithdrawal {
            target: ACCOUNT,
            gas_limit: U256::from(100_000),
            value: U256::from(10u64.pow(15)),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(sent, tx_hash);
}

#[tokio::test]
async fn test_deposit_requires_portal() {
    let (_asserter, pair) = mock_pair(ChainFamily::OpStack);
    let write = pair.write.as_ref().unwrap();

    let err = write
        .l1()
        .unwrap()
        .deposit_transaction(DepositTransaction {
            to: ACCOUNT,
            gas_limit: 100_000,
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ConnectError::Validation { .. }));
}
