//! # paveroute
//!
//! Declarative route-tree router. A nested definition tree - keys as path
//! segments, leaves as handlers or per-verb method bundles - is flattened
//! into an ordered table of compiled `:name` path templates, and a single
//! dispatch entry point matches incoming requests against that table,
//! extracts route parameters, merges them with query and body data, and
//! invokes the handler through configurable resolve/reject policies.
//!
//! ## Architecture
//!
//! - [`tree`] - route definition model ([`RouteTree`], [`MethodBundle`],
//!   handlers)
//! - [`pave`] - flattener turning the nested tree into `(path, leaf)` pairs
//! - [`router`] - table builder and first-match-wins matcher
//! - [`dispatcher`] - per-request dispatch and the default policies
//! - [`context`] - the hosting-framework seam ([`HostContext`], [`Next`])
//! - [`error`] - build-time and request-time error types
//!
//! ## Quick start
//!
//! ```rust
//! use paveroute::{handler, Dispatcher, MethodBundle, RouteTree};
//! use serde_json::json;
//!
//! let tree = RouteTree::new()
//!     .at("health", handler(|_msg, _hdrs, _ctx, _next| Ok(json!("ok"))))
//!     .at(
//!         "users",
//!         RouteTree::new().at(
//!             ":id",
//!             MethodBundle::new()
//!                 .get(|msg, _hdrs, _ctx, _next| Ok(json!({ "id": msg["id"] }))),
//!         ),
//!     );
//!
//! let dispatcher = Dispatcher::new(tree).expect("valid route tree");
//! # let _ = dispatcher;
//! ```
//!
//! The dispatcher mounts as middleware: the host calls
//! [`Dispatcher::handle`] once per request with its [`HostContext`]
//! implementation and a pass-through continuation. An unmatched request is
//! deferred to the continuation - 404 generation stays with the host.
//!
//! Matching is declaration-order, first match wins. Overlapping templates
//! resolve by position in the tree, never by specificity.

pub mod context;
pub mod dispatcher;
pub mod error;
pub mod pave;
pub mod router;
pub mod tree;

pub use context::{parse_query_params, strip_query, Headers, HostContext, Message, Next};
pub use dispatcher::{Dispatcher, RejectFn, ResolveFn};
pub use error::{reject, DefinitionError, DispatchError};
pub use router::{MethodRule, ParamVec, RouteMatch, RouteRecord, Router};
pub use tree::{handler, Handler, HandlerResult, MethodBundle, RouteNode, RouteTree};
