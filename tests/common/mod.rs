//! Shared test host: a minimal hosting-framework stand-in that records what
//! the dispatcher writes.

use paveroute::{Dispatcher, HostContext};
use serde_json::Value;

/// Mock per-request context. Query parameters are derived from the URI the
/// way a host framework would pre-parse them; the response side records
/// status, body and the finalized flag.
pub struct MockContext {
    pub method: String,
    pub uri: String,
    pub body_in: Option<Value>,
    pub headers_in: Vec<(String, String)>,
    pub ip: String,
    pub status: Option<u16>,
    pub body_out: Option<Value>,
    pub finalized: bool,
}

impl MockContext {
    pub fn new(method: &str, uri: &str) -> Self {
        Self {
            method: method.to_string(),
            uri: uri.to_string(),
            body_in: None,
            headers_in: Vec::new(),
            ip: "127.0.0.1".to_string(),
            status: None,
            body_out: None,
            finalized: false,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body_in = Some(body);
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers_in.push((name.to_string(), value.to_string()));
        self
    }

    /// Status the host would send: the explicit one, or the 200 default once
    /// a body was committed.
    pub fn sent_status(&self) -> u16 {
        self.status.unwrap_or(200)
    }
}

impl HostContext for MockContext {
    fn method(&self) -> &str {
        &self.method
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    fn query_params(&self) -> Vec<(String, String)> {
        paveroute::parse_query_params(&self.uri)
    }

    fn body(&self) -> Option<&Value> {
        self.body_in.as_ref()
    }

    fn header_pairs(&self) -> Vec<(String, String)> {
        self.headers_in.clone()
    }

    fn remote_ip(&self) -> String {
        self.ip.clone()
    }

    fn is_finalized(&self) -> bool {
        self.finalized
    }

    fn set_status(&mut self, status: u16) {
        self.status = Some(status);
    }

    fn set_body(&mut self, body: Value) {
        self.body_out = Some(body);
        self.finalized = true;
    }
}

/// Run one request through the dispatcher, counting pass-through calls.
pub fn run(dispatcher: &Dispatcher, ctx: &mut MockContext) -> (anyhow::Result<()>, usize) {
    let mut next_calls = 0usize;
    let mut next = || -> anyhow::Result<()> {
        next_calls += 1;
        Ok(())
    };
    let result = dispatcher.handle(ctx, &mut next);
    (result, next_calls)
}

#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
