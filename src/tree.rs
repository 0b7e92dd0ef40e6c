//! Route definition model.
//!
//! A route tree is a nested mapping: keys are path segments (or several
//! segments at once, `"f/:id"` is a valid key), values are sub-trees or
//! leaves. A leaf is either a plain [`Handler`] answering every verb, or a
//! [`MethodBundle`] exposing one path with different behavior per verb.
//!
//! Insertion order is preserved everywhere because it decides match priority:
//! first declared, first tried.

use crate::context::{Headers, HostContext, Message, Next};
use crate::error::DispatchError;
use http::Method;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Outcome of a handler invocation: a value to commit as the response body,
/// or a failure for the reject policy.
pub type HandlerResult = Result<Value, DispatchError>;

/// Route handler: `(message, headers, ctx, next) -> value or failure`.
///
/// Opaque to the router; it owns neither the handler's state nor its
/// side effects on the context.
pub type Handler = Arc<
    dyn Fn(&Message, &Headers, &mut dyn HostContext, Next<'_, '_>) -> HandlerResult + Send + Sync,
>;

/// Wrap a closure as a route-tree leaf answering every verb.
pub fn handler<F>(f: F) -> RouteNode
where
    F: Fn(&Message, &Headers, &mut dyn HostContext, Next<'_, '_>) -> HandlerResult
        + Send
        + Sync
        + 'static,
{
    RouteNode::Handler(Arc::new(f))
}

/// One path exposing different behavior per verb.
///
/// Declaration order is preserved and becomes record order in the dispatch
/// table. An empty bundle is legal and simply contributes no routes.
#[derive(Clone, Default)]
pub struct MethodBundle {
    entries: Vec<(Method, Handler)>,
}

impl MethodBundle {
    /// Create an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Attach a handler for an arbitrary verb.
    ///
    /// Extension methods (`COPY`, `PURGE`, `LOCK`, `PROPFIND`, ...) are built
    /// with `Method::from_bytes`; the standard verbs have sugar below.
    #[must_use]
    pub fn on<F>(mut self, method: Method, f: F) -> Self
    where
        F: Fn(&Message, &Headers, &mut dyn HostContext, Next<'_, '_>) -> HandlerResult
            + Send
            + Sync
            + 'static,
    {
        self.entries.push((method, Arc::new(f)));
        self
    }

    /// Attach a GET handler.
    #[must_use]
    pub fn get<F>(self, f: F) -> Self
    where
        F: Fn(&Message, &Headers, &mut dyn HostContext, Next<'_, '_>) -> HandlerResult
            + Send
            + Sync
            + 'static,
    {
        self.on(Method::GET, f)
    }

    /// Attach a POST handler.
    #[must_use]
    pub fn post<F>(self, f: F) -> Self
    where
        F: Fn(&Message, &Headers, &mut dyn HostContext, Next<'_, '_>) -> HandlerResult
            + Send
            + Sync
            + 'static,
    {
        self.on(Method::POST, f)
    }

    /// Attach a PUT handler.
    #[must_use]
    pub fn put<F>(self, f: F) -> Self
    where
        F: Fn(&Message, &Headers, &mut dyn HostContext, Next<'_, '_>) -> HandlerResult
            + Send
            + Sync
            + 'static,
    {
        self.on(Method::PUT, f)
    }

    /// Attach a PATCH handler.
    #[must_use]
    pub fn patch<F>(self, f: F) -> Self
    where
        F: Fn(&Message, &Headers, &mut dyn HostContext, Next<'_, '_>) -> HandlerResult
            + Send
            + Sync
            + 'static,
    {
        self.on(Method::PATCH, f)
    }

    /// Attach a DELETE handler.
    #[must_use]
    pub fn delete<F>(self, f: F) -> Self
    where
        F: Fn(&Message, &Headers, &mut dyn HostContext, Next<'_, '_>) -> HandlerResult
            + Send
            + Sync
            + 'static,
    {
        self.on(Method::DELETE, f)
    }

    /// Attach a HEAD handler.
    #[must_use]
    pub fn head<F>(self, f: F) -> Self
    where
        F: Fn(&Message, &Headers, &mut dyn HostContext, Next<'_, '_>) -> HandlerResult
            + Send
            + Sync
            + 'static,
    {
        self.on(Method::HEAD, f)
    }

    /// Attach an OPTIONS handler.
    #[must_use]
    pub fn options<F>(self, f: F) -> Self
    where
        F: Fn(&Message, &Headers, &mut dyn HostContext, Next<'_, '_>) -> HandlerResult
            + Send
            + Sync
            + 'static,
    {
        self.on(Method::OPTIONS, f)
    }

    /// Declared `(verb, handler)` pairs in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[(Method, Handler)] {
        &self.entries
    }

    /// Whether the bundle declares no verbs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for MethodBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verbs: Vec<&str> = self.entries.iter().map(|(m, _)| m.as_str()).collect();
        f.debug_tuple("MethodBundle").field(&verbs).finish()
    }
}

/// Nested route definition: segment names mapped to sub-trees or leaves,
/// insertion order preserved.
#[derive(Clone, Default)]
pub struct RouteTree {
    entries: Vec<(String, RouteNode)>,
}

impl RouteTree {
    /// Create an empty tree. An empty tree builds a router that never
    /// matches anything and always defers to the pass-through.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Mount a node under `key`.
    ///
    /// Keys may span several segments (`"a/b"`, `"f/:id"`); they are joined
    /// verbatim when the tree is flattened.
    #[must_use]
    pub fn at(mut self, key: impl Into<String>, node: impl Into<RouteNode>) -> Self {
        self.entries.push((key.into(), node.into()));
        self
    }

    /// `(key, node)` pairs in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[(String, RouteNode)] {
        &self.entries
    }

    /// Whether the tree has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for RouteTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

/// A node of the route definition tree.
///
/// Leaves must be handlers or method bundles. The `Value` variant represents
/// plain data dropped into a tree (for trees assembled from dynamic sources);
/// it is representable so that table construction can reject it with the
/// documented build-time error instead of a panic.
#[derive(Clone)]
pub enum RouteNode {
    /// Nested sub-tree; flattening recurses into it.
    Tree(RouteTree),
    /// Leaf answering every verb.
    Handler(Handler),
    /// Leaf answering per declared verb.
    Bundle(MethodBundle),
    /// Non-handler leaf, rejected at build time.
    Value(Value),
}

impl RouteNode {
    /// Kind name used in definition errors.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RouteNode::Tree(_) => "mapping",
            RouteNode::Handler(_) => "handler",
            RouteNode::Bundle(_) => "method bundle",
            RouteNode::Value(_) => "value",
        }
    }
}

impl Default for RouteNode {
    fn default() -> Self {
        RouteNode::Tree(RouteTree::new())
    }
}

impl fmt::Debug for RouteNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteNode::Tree(tree) => fmt::Debug::fmt(tree, f),
            RouteNode::Handler(_) => f.write_str("Handler"),
            RouteNode::Bundle(bundle) => fmt::Debug::fmt(bundle, f),
            RouteNode::Value(value) => write!(f, "Value({value})"),
        }
    }
}

impl From<RouteTree> for RouteNode {
    fn from(tree: RouteTree) -> Self {
        RouteNode::Tree(tree)
    }
}

impl From<MethodBundle> for RouteNode {
    fn from(bundle: MethodBundle) -> Self {
        RouteNode::Bundle(bundle)
    }
}

impl From<Value> for RouteNode {
    fn from(value: Value) -> Self {
        RouteNode::Value(value)
    }
}
