//! # Router module
//!
//! Table building and path matching. A route tree is compiled once at mount
//! time into an ordered list of [`RouteRecord`]s; incoming requests are then
//! matched with a first-match-wins linear scan, so overlapping templates
//! resolve by declaration order, never by specificity. That scan order is
//! observable behavior and is kept deliberately.
//!
//! Compilation turns `:name` path templates into anchored regexes
//! (`/users/:id` becomes `^/users/([^/]+)$`) and records the parameter names
//! in declaration order for capture extraction.

mod core;

pub use core::{MethodRule, ParamVec, RouteMatch, RouteRecord, Router, MAX_INLINE_PARAMS};
