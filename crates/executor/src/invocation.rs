//! Host interface of one invocation
//!
//! The host platform supplies everything the workflow cannot decide on its
//! own: the transaction id and timestamp, who is calling, from which
//! application, and a way to call other applications synchronously.
//!
//! [`StaticInvocation`] is a fixed implementation for embedding and tests.
//! Application replies are scripted per application and every call is
//! recorded.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;

use covenant_core::{ApplicationId, CovenantError, CovenantResult, SignerId, Timestamp};

/// Status of a successful application call
pub const STATUS_OK: u16 = 200;

/// Status of a failed application call
pub const STATUS_ERROR: u16 = 500;

/// Reply of a cross-application call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeResponse {
    /// 200 on success
    pub status: u16,
    /// Failure message
    pub message: String,
    /// Opaque result
    pub payload: Vec<u8>,
}

impl InvokeResponse {
    /// Successful reply carrying `payload`
    pub fn ok(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            status: STATUS_OK,
            message: String::new(),
            payload: payload.into(),
        }
    }

    /// Failed reply carrying `message`
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    /// Whether the call succeeded
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Everything the host provides to one workflow invocation
pub trait Invocation {
    /// Id of the enclosing host transaction
    fn tx_id(&self) -> &str;

    /// Deterministic transaction time, identical on every replica
    fn tx_timestamp(&self) -> Timestamp;

    /// Identity of the caller
    ///
    /// With `require_auth`, an unauthenticated caller is an `Identity` error.
    fn caller(&self, require_auth: bool) -> CovenantResult<SignerId>;

    /// Identity of the application that issued the call
    fn calling_application(&self) -> CovenantResult<ApplicationId>;

    /// Call `application` synchronously with `args`
    fn invoke_application(&self, application: &ApplicationId, args: &[Vec<u8>]) -> InvokeResponse;
}

/// An application call made through a [`StaticInvocation`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Target application
    pub application: ApplicationId,
    /// Arguments as passed
    pub args: Vec<Vec<u8>>,
}

impl RecordedCall {
    /// First argument as text (the callback function name)
    pub fn function(&self) -> Option<&str> {
        self.args.first().and_then(|a| std::str::from_utf8(a).ok())
    }
}

/// Fixed host values with scripted application replies
///
/// Applications without a scripted reply answer `200` with an empty payload.
#[derive(Debug)]
pub struct StaticInvocation {
    tx_id: String,
    timestamp: Timestamp,
    caller: Option<SignerId>,
    authenticated: bool,
    calling_application: Option<ApplicationId>,
    replies: Mutex<HashMap<ApplicationId, VecDeque<InvokeResponse>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StaticInvocation {
    /// Authenticated `caller` at `timestamp` in transaction `tx_id`
    pub fn new(tx_id: impl Into<String>, timestamp: Timestamp, caller: impl Into<SignerId>) -> Self {
        Self {
            tx_id: tx_id.into(),
            timestamp,
            caller: Some(caller.into()),
            authenticated: true,
            calling_application: None,
            replies: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Set the calling application
    pub fn with_application(mut self, application: impl Into<ApplicationId>) -> Self {
        self.calling_application = Some(application.into());
        self
    }

    /// Mark the caller as not authenticated
    pub fn unauthenticated(mut self) -> Self {
        self.authenticated = false;
        self
    }

    /// Remove the caller identity entirely
    pub fn anonymous(mut self) -> Self {
        self.caller = None;
        self.authenticated = false;
        self
    }

    /// Queue a reply for the next call to `application`
    pub fn reply(self, application: impl Into<ApplicationId>, response: InvokeResponse) -> Self {
        self.replies
            .lock()
            .entry(application.into())
            .or_default()
            .push_back(response);
        self
    }

    /// Application calls made so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }
}

impl Invocation for StaticInvocation {
    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn tx_timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn caller(&self, require_auth: bool) -> CovenantResult<SignerId> {
        match &self.caller {
            None => Err(CovenantError::Identity {
                reason: "no caller identity".to_string(),
            }),
            Some(_) if require_auth && !self.authenticated => Err(CovenantError::Identity {
                reason: "authentication required".to_string(),
            }),
            Some(id) => Ok(id.clone()),
        }
    }

    fn calling_application(&self) -> CovenantResult<ApplicationId> {
        self.calling_application.clone().ok_or_else(|| CovenantError::Identity {
            reason: "no calling application".to_string(),
        })
    }

    fn invoke_application(&self, application: &ApplicationId, args: &[Vec<u8>]) -> InvokeResponse {
        self.calls.lock().push(RecordedCall {
            application: application.clone(),
            args: args.to_vec(),
        });
        self.replies
            .lock()
            .get_mut(application)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| InvokeResponse::ok(Vec::new()))
    }
}
