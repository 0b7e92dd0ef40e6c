//! Hosting-framework seam.
//!
//! This crate never owns the HTTP lifecycle. The host (whatever server or
//! framework mounts the dispatcher) exposes one request at a time through
//! [`HostContext`] and supplies the pass-through continuation as [`Next`].
//! Request data arrives pre-parsed: the host parses bodies and query strings,
//! this crate only merges and routes.

use serde_json::Value;
use std::collections::HashMap;

/// Unified request message handed to handlers: query parameters, body fields
/// and route parameters merged into one object, route parameters winning on
/// key collision.
pub type Message = serde_json::Map<String, Value>;

/// Normalized request headers: lowerCamelCase keys plus synthetic `method`
/// (lowercased request method) and `ip` entries.
pub type Headers = HashMap<String, String>;

/// Pass-through continuation supplied by the hosting framework.
///
/// Invoked when no route matches, and handed to handlers and policies so they
/// can decline responsibility themselves. The reference lifetime is separate
/// from the closure's own bound so the dispatcher can reborrow it for the
/// resolve policy and still have it for the reject policy.
pub type Next<'a, 'f> = &'a mut (dyn FnMut() -> anyhow::Result<()> + 'f);

/// Per-request surface the hosting framework must expose.
///
/// The request side is read-only and pre-parsed by the host. The response
/// side is a mutable status/body surface with an explicit finalized signal:
/// [`set_body`](HostContext::set_body) commits the response, and once
/// [`is_finalized`](HostContext::is_finalized) reports true the default
/// policies take no further action (first writer wins).
pub trait HostContext {
    /// Raw request method token, any case.
    fn method(&self) -> &str;

    /// Request target: path plus optional query string.
    fn uri(&self) -> &str;

    /// Query parameters, already decoded by the host. Later pairs overwrite
    /// earlier ones when merged into the message.
    fn query_params(&self) -> Vec<(String, String)>;

    /// Request body, already parsed by the host. Only object bodies
    /// contribute fields to the message.
    fn body(&self) -> Option<&Value>;

    /// Raw header pairs in arrival order.
    fn header_pairs(&self) -> Vec<(String, String)>;

    /// Client address.
    fn remote_ip(&self) -> String;

    /// Whether a body was already committed to the response.
    fn is_finalized(&self) -> bool;

    /// Set the response status without committing a body.
    fn set_status(&mut self, status: u16);

    /// Commit the response body. After this the response counts as
    /// finalized; hosts default the status to success when none was set.
    fn set_body(&mut self, body: Value);
}

/// Strip the query string from a request target.
#[must_use]
pub fn strip_query(uri: &str) -> &str {
    match uri.find('?') {
        Some(pos) => &uri[..pos],
        None => uri,
    }
}

/// Parse query parameters out of a request target.
///
/// Convenience for host adapters whose framework does not pre-parse the
/// query string; names and values are percent-decoded.
#[must_use]
pub fn parse_query_params(uri: &str) -> Vec<(String, String)> {
    match uri.find('?') {
        Some(pos) => url::form_urlencoded::parse(uri[pos + 1..].as_bytes())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_query_removes_everything_after_question_mark() {
        assert_eq!(strip_query("/a/b?x=1&y=2"), "/a/b");
        assert_eq!(strip_query("/a/b"), "/a/b");
        assert_eq!(strip_query("/?"), "/");
    }

    #[test]
    fn parse_query_params_decodes_pairs() {
        let params = parse_query_params("/p?a=1&b=two%20words");
        assert_eq!(
            params,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "two words".to_string()),
            ]
        );
        assert!(parse_query_params("/p").is_empty());
    }
}
