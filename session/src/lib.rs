pub mod config;
pub mod connection;
pub mod session;
pub mod state;

pub use connection::{HttpConnection, ImmediateExecution};
pub use session::{SessionBundle, SessionComposer, build_session};
pub use state::{AccountState, Connection, ConnectedState, ExecutionPolicy, NetworkState};
