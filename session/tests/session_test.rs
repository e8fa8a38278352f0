use fixtures::*;

use std::future::Future;

use alloy::{
    primitives::{U64, U256},
    transports::{
        BoxTransport,
        mock::{Asserter, MockTransport},
    },
};
use connect_core::{
    actions::gas_oracle::GasPriceOracleParameters,
    client::{PublicActions, WalletActions},
    error::ConnectError,
};
use connect_session::{
    ConnectedState, ExecutionPolicy, ImmediateExecution, SessionComposer, build_session,
};
use serde_json::json;

#[tokio::test]
async fn test_build_session_wires_everything() {
    setup_tracing();
    let state = connected_state();
    let session = build_session(state.connection, state.account, state.network, None);

    assert_eq!(session.account.address, ACCOUNT);

    let read = session.client.read.as_ref().unwrap();
    let write = session.client.write.as_ref().unwrap();
    assert_eq!(read.chain().chain_id, "10");
    assert_eq!(
        read.layers(),
        &[PublicActions::L2, PublicActions::L1, PublicActions::GasOracle]
    );
    assert_eq!(write.layers(), &[WalletActions::L2, WalletActions::L1]);
    assert_eq!(write.account(), ACCOUNT);

    let token = session.contract("token").unwrap();
    assert_eq!(token.address(), TOKEN);
    let estimators = token.estimate_all_fees().unwrap();
    assert_eq!(estimators.function_names().collect::<Vec<_>>(), vec!["transfer"]);
}

#[tokio::test]
async fn test_provider_override_is_used() {
    setup_tracing();
    let state = connected_state();

    let override_asserter = Asserter::new();
    override_asserter.push_success(&uint_word(42));
    let transport = BoxTransport::new(MockTransport::new(override_asserter));

    // The connection's own asserter stays empty; a request through it would fail
    let session = build_session(state.connection, state.account, state.network, Some(transport));
    let fee = session
        .client
        .read
        .as_ref()
        .unwrap()
        .gas_oracle()
        .unwrap()
        .get_l1_base_fee(GasPriceOracleParameters::default())
        .await
        .unwrap();

    assert_eq!(fee, U256::from(42));
}

#[tokio::test]
async fn test_execute_returns_callback_value() {
    setup_tracing();
    let state = connected_state();
    state.connection.asserter.push_success(&U64::from(46_000));

    let composer = SessionComposer::new(ImmediateExecution::new(state));
    let gas = composer
        .execute(|session| async move {
            let transfer = session
                .contract("token")
                .and_then(|token| token.estimate_all_fees())
                .and_then(|estimators| estimators.get("transfer"))
                .ok_or_else(|| ConnectError::callback("token has no transfer estimator"))?;

            transfer
                .estimate(&[json!(["0x70997970C51812dc3A010C7d01b50e0d17dc79C8", "1"])])
                .await
        })
        .await
        .unwrap();

    assert_eq!(gas, Some(46_000));
}

#[tokio::test]
async fn test_execute_propagates_callback_error() {
    let composer = SessionComposer::new(ImmediateExecution::new(connected_state()));

    let result: Result<Option<()>, _> = composer
        .execute(|_session| async move { Err(ConnectError::callback("user rejected")) })
        .await;

    match result {
        Err(ConnectError::Callback { message }) => assert_eq!(message, "user rejected"),
        other => panic!("Expected callback error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_disconnected_policy_declines() {
    let composer = SessionComposer::new(ImmediateExecution::<MockConnection>::disconnected());

    let result = composer
        .execute(|_session| async move { Ok::<_, ConnectError>("ran") })
        .await
        .unwrap();

    assert_eq!(result, None);
}

/// Asks for confirmation and only runs when it is given
struct ConfirmingPolicy {
    confirmed: bool,
}

impl ExecutionPolicy for ConfirmingPolicy {
    type Connection = MockConnection;

    async fn execute<T, F, Fut>(&self, callback: F) -> Result<Option<T>, ConnectError>
    where
        T: Send,
        F: FnOnce(ConnectedState<MockConnection>) -> Fut + Send,
        Fut: Future<Output = Result<T, ConnectError>> + Send,
    {
        if !self.confirmed {
            return Ok(None);
        }
        callback(connected_state()).await.map(Some)
    }
}

#[tokio::test]
async fn test_custom_policy_decides() {
    let declined = SessionComposer::new(ConfirmingPolicy { confirmed: false })
        .execute(|session| async move { Ok::<_, ConnectError>(session.contracts.len()) })
        .await
        .unwrap();
    assert_eq!(declined, None);

    let confirmed = SessionComposer::new(ConfirmingPolicy { confirmed: true })
        .execute(|session| async move { Ok::<_, ConnectError>(session.contracts.len()) })
        .await
        .unwrap();
    assert_eq!(confirmed, Some(1));
}
