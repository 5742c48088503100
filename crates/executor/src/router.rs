//! Static routing table
//!
//! Function names map to [`Route`] once; parameters are then parsed into a
//! typed [`Command`]. There is no runtime registration.
//!
//! | Function | Params |
//! |----------|--------|
//! | `create` | document, expiry seconds, signer... (3+) |
//! | `approve` | contract id |
//! | `disapprove` | contract id |
//! | `cancel` | contract id |
//! | `get` | contract id |
//! | `list` | application id, [mode], [bookmark] |
//! | `ver` | none |

use covenant_core::{ApplicationId, ContractId, CovenantError, CovenantResult, SignerId};

use crate::Command;

/// One entry of the routing table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Propose a contract
    Create,
    /// Approve as the caller
    Approve,
    /// Disapprove as the caller
    Disapprove,
    /// Cancel from the owning application
    Cancel,
    /// Read the caller's record
    Get,
    /// List the caller's contracts
    List,
    /// Version string
    Version,
}

impl Route {
    /// Every route, in table order
    pub const ALL: [Route; 7] = [
        Route::Approve,
        Route::Cancel,
        Route::Create,
        Route::Disapprove,
        Route::Get,
        Route::List,
        Route::Version,
    ];

    /// Look up a function name
    ///
    /// # Errors
    /// `UnknownFunction` for names not in the table.
    pub fn from_name(name: &str) -> CovenantResult<Route> {
        match name {
            "create" => Ok(Route::Create),
            "approve" => Ok(Route::Approve),
            "disapprove" => Ok(Route::Disapprove),
            "cancel" => Ok(Route::Cancel),
            "get" => Ok(Route::Get),
            "list" => Ok(Route::List),
            "ver" => Ok(Route::Version),
            _ => Err(CovenantError::UnknownFunction {
                name: name.to_string(),
            }),
        }
    }

    /// Function name of this route
    pub fn name(self) -> &'static str {
        match self {
            Route::Create => "create",
            Route::Approve => "approve",
            Route::Disapprove => "disapprove",
            Route::Cancel => "cancel",
            Route::Get => "get",
            Route::List => "list",
            Route::Version => "ver",
        }
    }

    /// Message prefixed to `err` when this route fails
    pub fn error_context(self, err: &CovenantError) -> &'static str {
        if let CovenantError::CallbackFailure { .. } = err {
            match self {
                Route::Approve => return "failed to execute the contract",
                Route::Disapprove => return "failed to cancel the contract",
                _ => {}
            }
        }
        match self {
            Route::Create => "failed to create a contract",
            Route::Approve => "failed to approve the contract",
            Route::Disapprove => "failed to disapprove the contract",
            Route::Cancel => "failed to cancel the contract",
            Route::Get => "failed to get the contract",
            Route::List => "failed to get contracts list",
            Route::Version => "",
        }
    }

    /// Parse positional parameters into a command
    ///
    /// # Errors
    /// `InvalidInput` for a wrong parameter count.
    pub fn parse(self, params: &[String]) -> CovenantResult<Command> {
        match self {
            Route::Create => {
                if params.len() < 3 {
                    return Err(param_count("3+"));
                }
                Ok(Command::Create {
                    document: params[0].clone(),
                    // Unparsable expiry means "use the default"
                    expiry_secs: params[1].trim().parse().unwrap_or(0),
                    signers: params[2..].iter().map(|s| SignerId::new(s.as_str())).collect(),
                })
            }
            Route::Approve => Ok(Command::Approve {
                id: single_id(params)?,
            }),
            Route::Disapprove => Ok(Command::Disapprove {
                id: single_id(params)?,
            }),
            Route::Cancel => Ok(Command::Cancel {
                id: single_id(params)?,
            }),
            Route::Get => Ok(Command::Get {
                id: single_id(params)?,
            }),
            Route::List => {
                let application_id = params
                    .first()
                    .map(|p| ApplicationId::new(p.as_str()))
                    .ok_or_else(|| param_count("1+"))?;
                Ok(Command::List {
                    application_id,
                    mode: params.get(1).cloned(),
                    bookmark: params.get(2).cloned(),
                })
            }
            Route::Version => Ok(Command::Version),
        }
    }
}

fn param_count(expected: &str) -> CovenantError {
    CovenantError::invalid_input(format!(
        "incorrect number of parameters. expecting {}",
        expected
    ))
}

fn single_id(params: &[String]) -> CovenantResult<ContractId> {
    match params {
        [id] => Ok(ContractId::new(id.as_str())),
        _ => Err(param_count("1")),
    }
}
