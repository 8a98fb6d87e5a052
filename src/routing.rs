//! Route records and the selector lookup table.

use std::collections::HashMap;

use serde::Deserialize;

/// One delivery route from the routes file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Routing key matched against the selector parsed from message text.
    /// The empty string marks the default/catch-all bucket.
    pub selector: String,
    /// Envelope/From address.
    pub sender: String,
    /// Envelope/To address.
    pub recipient: String,
    pub user: String,
    pub password: String,
    pub server: String,
    pub port: u16,
    /// Per-delivery length limit; long bodies are split against it.
    pub max_length: usize,
    /// 0/1 flag: prepend the SMS sender to the body before splitting.
    pub with_sender: u8,
}

impl Route {
    pub fn include_sender(&self) -> bool {
        self.with_sender == 1
    }
}

/// Immutable multimap from lowercase selector to delivery routes.
///
/// Built once at startup and never mutated. Per-bucket order follows
/// the routes file, which is also the fan-out broadcast order.
#[derive(Debug)]
pub struct RouteTable {
    buckets: HashMap<String, Vec<Route>>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        let mut buckets: HashMap<String, Vec<Route>> = HashMap::new();
        for route in routes {
            buckets
                .entry(route.selector.to_lowercase())
                .or_default()
                .push(route);
        }
        Self { buckets }
    }

    /// Look up routes for a selector, case-insensitively.
    ///
    /// An unknown selector falls back to the `""` bucket; if that is
    /// also absent the result is empty, which callers treat as a
    /// routing miss rather than an error.
    pub fn route(&self, selector: &str) -> &[Route] {
        if let Some(routes) = self.buckets.get(&selector.to_lowercase()) {
            return routes;
        }
        self.buckets.get("").map(Vec::as_slice).unwrap_or(&[])
    }
}
