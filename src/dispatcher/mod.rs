//! # Dispatcher module
//!
//! Per-request dispatch over a compiled table. One [`Dispatcher`] is built at
//! mount time and serves every request: strip the query, scan the table,
//! extract parameters, merge the message, normalize headers, invoke the
//! handler through the resolve policy. Failures go to the reject policy.
//!
//! The resolve/reject pair is the configuration surface. The defaults
//! implement the documented behavior (commit the handler's return value
//! unless the response is already finalized; machine-readable failure
//! bodies) and can be replaced wholesale via [`Dispatcher::with_resolve`] /
//! [`Dispatcher::with_reject`].
//!
//! The table is immutable after construction, so a single dispatcher serves
//! concurrent requests without locking; concurrency itself belongs to the
//! hosting server.

mod core;

pub use core::{Dispatcher, RejectFn, ResolveFn};
