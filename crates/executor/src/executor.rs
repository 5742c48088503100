//! The Executor - single entry point to the contract engine.
//!
//! The Executor is a stateless dispatcher that routes commands to the
//! contract handlers and turns results into host responses.

use std::sync::Arc;

use tracing::debug;

use covenant_core::CovenantResult;
use covenant_engine::Database;

use crate::handlers::contract;
use crate::response::{respond_error, Response};
use crate::{Command, Invocation, Output, Route};

/// Version string returned by the `ver` route
pub const VERSION: &str = concat!("Covenant v", env!("CARGO_PKG_VERSION"));

/// The command executor - single entry point to the contract engine.
///
/// The Executor is **stateless**: it holds a reference to the database but
/// maintains no state of its own.
///
/// # Thread Safety
///
/// Executor is `Send + Sync` and can be shared across threads.
///
/// # Example
///
/// ```
/// use covenant_core::Timestamp;
/// use covenant_engine::Database;
/// use covenant_executor::{Executor, StaticInvocation};
///
/// let executor = Executor::new(Database::ephemeral());
/// let inv = StaticInvocation::new("tx-1", Timestamp::from_secs(1_700_000_000), "alice")
///     .with_application("escrow");
///
/// let params = vec!["{}".to_string(), "0".to_string(), "bob".to_string()];
/// let response = executor.invoke("create", &params, &inv);
/// assert!(response.is_ok());
/// ```
#[derive(Clone)]
pub struct Executor {
    db: Arc<Database>,
}

impl Executor {
    /// Create a new executor over `db`.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// The underlying database.
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Install the default subscriber with the configured `log_filter`.
    ///
    /// Returns `false` if the host already installed one.
    pub fn init_logging(&self) -> bool {
        crate::init_tracing(&self.db.config().log_filter)
    }

    /// Execute a single command.
    ///
    /// Returns the command result or an error.
    pub fn execute(&self, cmd: Command, inv: &dyn Invocation) -> CovenantResult<Output> {
        debug!(
            target: "covenant::executor",
            tx_id = inv.tx_id(),
            write = cmd.is_write(),
            command = ?cmd,
            "Executing command"
        );
        match cmd {
            Command::Create {
                document,
                expiry_secs,
                signers,
            } => contract::create(&self.db, inv, document, expiry_secs, signers),
            Command::Approve { id } => contract::approve(&self.db, inv, id),
            Command::Disapprove { id } => contract::disapprove(&self.db, inv, id),
            Command::Cancel { id } => contract::cancel(&self.db, inv, id),
            Command::Get { id } => contract::get(&self.db, inv, id),
            Command::List {
                application_id,
                mode,
                bookmark,
            } => contract::list(&self.db, inv, application_id, mode, bookmark),
            Command::Version => Ok(Output::Version(VERSION.to_string())),
        }
    }

    /// Route a host call by function name and positional parameters.
    ///
    /// Never fails: every error becomes a status-500 [`Response`].
    pub fn invoke(&self, function: &str, params: &[String], inv: &dyn Invocation) -> Response {
        let route = match Route::from_name(function) {
            Ok(route) => route,
            Err(e) => return respond_error(&e, ""),
        };
        let output = match route.parse(params).and_then(|cmd| self.execute(cmd, inv)) {
            Ok(output) => output,
            Err(e) => return respond_error(&e, route.error_context(&e)),
        };
        match output.to_payload() {
            Ok(payload) => Response::success(payload),
            Err(e) => respond_error(&e, "failed to marshal payload"),
        }
    }
}
