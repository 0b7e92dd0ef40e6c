//! Dispatcher core - the per-request hot path and the default policies.

use crate::context::{strip_query, Headers, HostContext, Message, Next};
use crate::error::{DefinitionError, DispatchError};
use crate::router::{ParamVec, Router};
use crate::tree::{Handler, RouteNode};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

/// Success policy: invoke the handler and commit its result.
///
/// Receives the matched handler, the merged message, the normalized headers,
/// the host context and the pass-through continuation. Returning `Err` hands
/// control to the reject policy.
pub type ResolveFn = Arc<
    dyn Fn(
            &Handler,
            &Message,
            &Headers,
            &mut dyn HostContext,
            Next<'_, '_>,
        ) -> Result<(), DispatchError>
        + Send
        + Sync,
>;

/// Failure policy: report a handler error to the client.
///
/// Errors returned by the reject policy itself propagate to the host
/// untouched; there is deliberately no second safety net around it.
pub type RejectFn = Arc<
    dyn Fn(
            &DispatchError,
            &Message,
            &Headers,
            &mut dyn HostContext,
            Next<'_, '_>,
        ) -> Result<(), DispatchError>
        + Send
        + Sync,
>;

/// Structured failure body produced by the default reject policy.
#[derive(Debug, Serialize)]
struct FailureBody<'a> {
    code: u16,
    succeed: bool,
    msg: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ext: Option<&'a Value>,
}

/// Request dispatcher bound to a compiled table and a resolve/reject pair.
///
/// Built once when the route tree is mounted; [`Dispatcher::handle`] is then
/// invoked per request by the hosting server integration.
pub struct Dispatcher {
    router: Router,
    resolve: ResolveFn,
    reject: RejectFn,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("router", &self.router)
            .finish()
    }
}

impl Dispatcher {
    /// Compile `tree` and bind the default resolve/reject policies.
    ///
    /// Fails with a [`DefinitionError`] when the tree root is not a mapping
    /// or a leaf is not a handler or method bundle; nothing of a partially
    /// built table survives.
    pub fn new(tree: impl Into<RouteNode>) -> Result<Self, DefinitionError> {
        let node = tree.into();
        Ok(Self {
            router: Router::new(&node)?,
            resolve: Arc::new(default_resolve),
            reject: Arc::new(default_reject),
        })
    }

    /// Replace the success policy.
    #[must_use]
    pub fn with_resolve(mut self, resolve: ResolveFn) -> Self {
        self.resolve = resolve;
        self
    }

    /// Replace the failure policy.
    #[must_use]
    pub fn with_reject(mut self, reject: RejectFn) -> Self {
        self.reject = reject;
        self
    }

    /// The compiled table.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Dispatch one request.
    ///
    /// No match defers to `next` - 404 generation stays with the hosting
    /// framework. On a match the handler runs through the resolve policy and
    /// any failure through the reject policy; an error from the reject
    /// policy itself propagates to the host.
    pub fn handle(&self, ctx: &mut dyn HostContext, next: Next<'_, '_>) -> anyhow::Result<()> {
        let path = strip_query(ctx.uri()).to_string();
        let method = ctx.method().to_string();

        let Some(matched) = self.router.match_route(&method, &path) else {
            return next();
        };

        let handler = matched.record.handler.clone();
        let message = build_message(&*ctx, &matched.params);
        let headers = build_headers(&*ctx, &method);

        debug!(
            method = %method,
            path = %path,
            route = %matched.record.path,
            "dispatching"
        );

        let resolve = self.resolve.as_ref();
        if let Err(err) = resolve(&handler, &message, &headers, ctx, &mut *next) {
            let reject = self.reject.as_ref();
            reject(&err, &message, &headers, ctx, next)?;
        }
        Ok(())
    }
}

/// Default success policy: run the handler, then commit its return value as
/// the response body unless the handler already finalized the response
/// itself (redirects, streaming writes).
fn default_resolve(
    handler: &Handler,
    message: &Message,
    headers: &Headers,
    ctx: &mut dyn HostContext,
    next: Next<'_, '_>,
) -> Result<(), DispatchError> {
    let f = handler.as_ref();
    let result = f(message, headers, ctx, next)?;
    if !ctx.is_finalized() {
        ctx.set_body(result);
    }
    Ok(())
}

/// Default failure policy: first writer wins, code-less errors log and map
/// to 500, and the client gets a machine-readable failure body.
fn default_reject(
    err: &DispatchError,
    message: &Message,
    _headers: &Headers,
    ctx: &mut dyn HostContext,
    _next: Next<'_, '_>,
) -> Result<(), DispatchError> {
    if ctx.is_finalized() {
        return Ok(());
    }

    let code = err.status();
    if err.code.is_none() {
        // A code-less error was not anticipated by the handler author.
        error!(
            path = strip_query(ctx.uri()),
            message = %serde_json::Value::Object(message.clone()),
            error = %err,
            "handler failed with unstructured error"
        );
    }

    let msg = err.to_string();
    let body = FailureBody {
        code,
        succeed: false,
        msg: &msg,
        ext: err.ext.as_ref(),
    };
    ctx.set_status(code);
    ctx.set_body(serde_json::to_value(&body).unwrap_or(Value::Null));
    Ok(())
}

/// Merge query parameters, body object fields and route parameters into one
/// message, in increasing precedence. A route template parameter overrides a
/// same-named query or body field deterministically; non-object bodies
/// contribute nothing.
fn build_message(ctx: &dyn HostContext, params: &ParamVec) -> Message {
    let mut message = Message::new();
    for (k, v) in ctx.query_params() {
        message.insert(k, Value::String(v));
    }
    if let Some(Value::Object(body)) = ctx.body() {
        for (k, v) in body {
            message.insert(k.clone(), v.clone());
        }
    }
    for (k, v) in params {
        message.insert(k.clone(), Value::String(v.clone()));
    }
    message
}

/// Normalize incoming headers to lowerCamelCase keys, then overwrite with
/// the synthetic `method` and `ip` entries.
fn build_headers(ctx: &dyn HostContext, method: &str) -> Headers {
    let mut headers: Headers = ctx
        .header_pairs()
        .into_iter()
        .map(|(k, v)| (camelize(&k), v))
        .collect();
    headers.insert("method".to_string(), method.to_ascii_lowercase());
    headers.insert("ip".to_string(), ctx.remote_ip());
    headers
}

/// lowerCamelCase a header name: `content-type` becomes `contentType`,
/// `X-Request-Id` becomes `xRequestId`.
fn camelize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut boundary = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if boundary && !out.is_empty() {
                out.push(ch.to_ascii_uppercase());
            } else {
                out.push(ch.to_ascii_lowercase());
            }
            boundary = false;
        } else {
            boundary = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camelize_normalizes_header_names() {
        assert_eq!(camelize("content-type"), "contentType");
        assert_eq!(camelize("X-Request-Id"), "xRequestId");
        assert_eq!(camelize("accept"), "accept");
        assert_eq!(camelize("x-forwarded-for"), "xForwardedFor");
    }

    #[test]
    fn failure_body_omits_missing_ext() {
        let body = FailureBody {
            code: 500,
            succeed: false,
            msg: "boom",
            ext: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "code": 500, "succeed": false, "msg": "boom" })
        );
    }
}
