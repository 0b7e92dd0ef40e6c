//! Build-time and request-time error types.
//!
//! The two families never mix: [`DefinitionError`] surfaces synchronously to
//! whoever constructs the router and aborts construction entirely, while
//! [`DispatchError`] is caught per request and handed to the reject policy.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Fatal failure while compiling a route tree into a dispatch table.
///
/// No partial table is usable after any of these; construction aborts.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// The flattener was handed something other than a nested mapping.
    #[error("route tree needs a mapping but got a {0}")]
    NotAMapping(&'static str),
    /// A leaf held plain data instead of a handler or method bundle.
    #[error("route handler must be function (at `{path}`)")]
    LeafNotHandler {
        /// Flattened path of the offending leaf.
        path: String,
    },
    /// A path template produced an uncompilable pattern.
    #[error("failed to compile pattern for `{path}`")]
    BadPattern {
        /// Path template that failed to compile.
        path: String,
        #[source]
        source: regex::Error,
    },
}

/// Request-time failure reported to the reject policy.
///
/// Carries an explicit `code` when raised deliberately via [`reject`]. Errors
/// converted from `anyhow` have no code; the default reject policy treats
/// those as unanticipated 500-class failures and logs them.
#[derive(Debug, Clone)]
pub struct DispatchError {
    /// HTTP status the failure maps to; `None` for unstructured errors.
    pub code: Option<u16>,
    /// Human-readable message, surfaced in the failure body.
    pub msg: String,
    /// Auxiliary payload attached to deliberate rejections.
    pub ext: Option<Value>,
}

impl DispatchError {
    /// Build a structured error with an explicit status code.
    #[must_use]
    pub fn new(code: u16, msg: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            msg: msg.into(),
            ext: None,
        }
    }

    /// Attach an auxiliary payload.
    #[must_use]
    pub fn with_ext(mut self, ext: Value) -> Self {
        self.ext = Some(ext);
        self
    }

    /// Status the default reject policy will report (500 when code is absent).
    #[must_use]
    pub fn status(&self) -> u16 {
        self.code.unwrap_or(500)
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.msg.is_empty() {
            f.write_str("unhandled error")
        } else {
            f.write_str(&self.msg)
        }
    }
}

impl std::error::Error for DispatchError {}

impl From<anyhow::Error> for DispatchError {
    /// An `anyhow` error becomes a code-less failure: message preserved
    /// (with its context chain), no status, no payload.
    fn from(err: anyhow::Error) -> Self {
        Self {
            code: None,
            msg: format!("{err:#}"),
            ext: None,
        }
    }
}

/// Build a structured error for a deliberate failure.
///
/// Handlers use this to signal a specific client- or server-facing failure,
/// as opposed to letting an unstructured error bubble up:
///
/// ```rust
/// use paveroute::reject;
/// use serde_json::json;
///
/// let err = reject(400, "params error", Some(json!({ "field": "name" })));
/// assert_eq!(err.status(), 400);
/// ```
#[must_use]
pub fn reject(code: u16, msg: impl Into<String>, ext: Option<Value>) -> DispatchError {
    DispatchError {
        code: Some(code),
        msg: msg.into(),
        ext,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unstructured_errors_default_to_500() {
        let err: DispatchError = anyhow::anyhow!("boom").into();
        assert_eq!(err.code, None);
        assert_eq!(err.status(), 500);
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn reject_carries_code_and_ext() {
        let err = reject(422, "bad input", Some(json!({ "a": 1 })));
        assert_eq!(err.status(), 422);
        assert_eq!(err.ext, Some(json!({ "a": 1 })));
    }

    #[test]
    fn empty_message_falls_back() {
        let err = DispatchError {
            code: None,
            msg: String::new(),
            ext: None,
        };
        assert_eq!(err.to_string(), "unhandled error");
    }
}
