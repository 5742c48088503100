//! Response boundary
//!
//! Every invocation ends here. Errors are logged in full at debug level;
//! the caller sees the route's context message, followed by the error text
//! only when the error kind is safe to expose.

use tracing::debug;

use covenant_core::CovenantError;

use crate::invocation::{STATUS_ERROR, STATUS_OK};

/// Result of one invocation as returned to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// 200 on success, 500 on failure
    pub status: u16,
    /// Error message; empty on success
    pub message: String,
    /// Result bytes; empty on failure
    pub payload: Vec<u8>,
}

impl Response {
    /// Successful response
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: STATUS_OK,
            message: String::new(),
            payload,
        }
    }

    /// Failed response carrying `message` as-is
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    /// Whether the invocation succeeded
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Payload as UTF-8 text
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

/// Convert an error into a failed response
///
/// Responsible errors yield `context|error` (or the error alone when
/// `context` is empty); every other error yields `context` only.
pub fn respond_error(err: &CovenantError, context: &str) -> Response {
    debug!(target: "covenant::executor", kind = err.kind().as_str(), error = %err, context, "Invocation failed");
    if !err.is_responsible() {
        return Response::error(context);
    }
    if context.is_empty() {
        Response::error(err.to_string())
    } else {
        Response::error(format!("{}|{}", context, err))
    }
}
