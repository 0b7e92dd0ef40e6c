//! Router core - table compilation and the request-matching hot path.

use crate::error::DefinitionError;
use crate::pave;
use crate::tree::{Handler, RouteNode};
use http::Method;
use regex::Regex;
use smallvec::SmallVec;
use tracing::{debug, info};

/// Maximum route parameters captured without heap allocation.
/// Most REST paths carry no more than a handful of `:name` segments.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated storage for extracted route parameters.
pub type ParamVec = SmallVec<[(String, String); MAX_INLINE_PARAMS]>;

/// Verb constraint attached to a compiled route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodRule {
    /// Matches every verb; produced by plain handler leaves.
    All,
    /// Matches exactly one verb; produced by method-bundle entries.
    Only(Method),
}

impl MethodRule {
    /// Whether a raw request method token satisfies this rule.
    /// Comparison is case-insensitive, matching hosts that report
    /// lowercase method names.
    #[must_use]
    pub fn accepts(&self, method: &str) -> bool {
        match self {
            MethodRule::All => true,
            MethodRule::Only(m) => m.as_str().eq_ignore_ascii_case(method),
        }
    }
}

/// One compiled route: the unit the dispatcher matches against.
///
/// Built once at table-build time, immutable thereafter, held for the
/// lifetime of the mounted router.
#[derive(Clone)]
pub struct RouteRecord {
    /// Anchored pattern compiled from the path template.
    pub pattern: Regex,
    /// Original template, e.g. `/users/:id`.
    pub path: String,
    /// Handler invoked on a match.
    pub handler: Handler,
    /// Parameter names in declaration order, zipped against captures.
    pub param_names: Vec<String>,
    /// Verb constraint.
    pub method: MethodRule,
}

/// A matched route together with its extracted parameters.
pub struct RouteMatch<'a> {
    /// The record that won the scan.
    pub record: &'a RouteRecord,
    /// `(name, value)` pairs in template declaration order.
    pub params: ParamVec,
}

/// Ordered dispatch table compiled from a route tree.
pub struct Router {
    records: Vec<RouteRecord>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("records", &self.records.len())
            .finish()
    }
}

impl Router {
    /// Compile a route tree into an ordered dispatch table.
    ///
    /// Flattens the tree with `/` as separator and prepends `/` to every
    /// path so all templates are absolute. A bundle leaf contributes one
    /// record per declared verb sharing the compiled pattern; a handler leaf
    /// contributes a single catch-all record. Any other leaf aborts
    /// construction.
    pub fn new(tree: &RouteNode) -> Result<Self, DefinitionError> {
        let mut records = Vec::new();
        for entry in pave::flatten(tree, "", "/")? {
            let path = format!("/{}", entry.path);
            match entry.leaf {
                RouteNode::Bundle(bundle) => {
                    for (method, handler) in bundle.entries() {
                        let (pattern, param_names) = path_to_regex(&path)?;
                        records.push(RouteRecord {
                            pattern,
                            path: path.clone(),
                            handler: handler.clone(),
                            param_names,
                            method: MethodRule::Only(method.clone()),
                        });
                    }
                }
                RouteNode::Handler(handler) => {
                    let (pattern, param_names) = path_to_regex(&path)?;
                    records.push(RouteRecord {
                        pattern,
                        path,
                        handler: handler.clone(),
                        param_names,
                        method: MethodRule::All,
                    });
                }
                _ => return Err(DefinitionError::LeafNotHandler { path }),
            }
        }

        let summary: Vec<String> = records
            .iter()
            .take(10)
            .map(|r| match &r.method {
                MethodRule::All => format!("ALL {}", r.path),
                MethodRule::Only(m) => format!("{m} {}", r.path),
            })
            .collect();
        info!(
            routes_count = records.len(),
            routes_summary = ?summary,
            "routing table built"
        );

        Ok(Self { records })
    }

    /// Match a request against the table, first declared first tried.
    ///
    /// A record wins when its pattern matches `path` and its verb rule
    /// accepts `method`. Returns `None` when nothing matches; the dispatcher
    /// then defers to the host's pass-through rather than producing a 404.
    #[must_use]
    pub fn match_route(&self, method: &str, path: &str) -> Option<RouteMatch<'_>> {
        for record in &self.records {
            if !record.method.accepts(method) {
                continue;
            }
            let Some(caps) = record.pattern.captures(path) else {
                continue;
            };

            let mut params = ParamVec::new();
            for (i, name) in record.param_names.iter().enumerate() {
                if let Some(value) = caps.get(i + 1) {
                    params.push((name.clone(), value.as_str().to_string()));
                }
            }

            debug!(
                method = %method,
                path = %path,
                route = %record.path,
                params = ?params,
                "route matched"
            );
            return Some(RouteMatch { record, params });
        }

        debug!(method = %method, path = %path, "no route matched");
        None
    }

    /// Compiled records in match order.
    #[must_use]
    pub fn records(&self) -> &[RouteRecord] {
        &self.records
    }

    /// Print all registered routes to stdout. Debugging aid.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.records.len());
        for record in &self.records {
            match &record.method {
                MethodRule::All => println!("[route] ALL {}", record.path),
                MethodRule::Only(m) => println!("[route] {m} {}", record.path),
            }
        }
    }
}

/// Compile a `:name` path template into an anchored regex plus the ordered
/// parameter names.
///
/// `/a/:x/:y` compiles to `^/a/([^/]+)/([^/]+)$` with names `["x", "y"]`.
/// Literal segments are regex-escaped, so templates may contain
/// metacharacters without effect on matching.
pub(crate) fn path_to_regex(path: &str) -> Result<(Regex, Vec<String>), DefinitionError> {
    let mut pattern = String::with_capacity(path.len() + 8);
    pattern.push('^');
    let mut param_names = Vec::new();

    for segment in path.split('/') {
        if let Some(name) = segment.strip_prefix(':') {
            pattern.push_str("/([^/]+)");
            param_names.push(name.to_string());
        } else if !segment.is_empty() {
            pattern.push('/');
            pattern.push_str(&regex::escape(segment));
        }
    }
    if pattern == "^" {
        // Template was bare "/" (or all-empty segments).
        pattern.push('/');
    }
    pattern.push('$');

    let regex = Regex::new(&pattern).map_err(|source| DefinitionError::BadPattern {
        path: path.to_string(),
        source,
    })?;
    Ok((regex, param_names))
}
