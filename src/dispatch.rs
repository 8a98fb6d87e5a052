//! Routes a decoded SMS through selector extraction, the route table,
//! and per-route splitting, then hands each part to the mailer.

use std::sync::Arc;

use deunicode::deunicode;
use tracing::{error, info, warn};

use crate::mailer::Mailer;
use crate::routing::RouteTable;
use crate::split::split_into_parts;

/// Pull the routing selector off the front of a message.
///
/// The selector is the text before the first `:`, but only when no
/// space occurs before it; otherwise the text has no selector. The
/// colon stays at the front of the returned body.
pub fn extract_selector(text: &str) -> (&str, &str) {
    let trimmed = text.trim_matches([' ', '\t']);
    let cpos = trimmed.find(':');
    let spos = trimmed.find(' ');
    match cpos {
        Some(c) if c > 0 => match spos {
            Some(s) if s < c => ("", trimmed),
            _ => (&trimmed[..c], &trimmed[c..]),
        },
        _ => ("", trimmed),
    }
}

/// Fans a parsed (sender, text) pair out to every matching route.
pub struct Dispatcher {
    routes: RouteTable,
    mailer: Arc<dyn Mailer>,
}

impl Dispatcher {
    pub fn new(routes: RouteTable, mailer: Arc<dyn Mailer>) -> Self {
        Self { routes, mailer }
    }

    /// Deliver one message, best-effort.
    ///
    /// A routing miss drops the message with a warning. Per-part send
    /// failures are logged and never abort the remaining parts or the
    /// remaining routes; the call returns once every part has been
    /// attempted.
    pub fn dispatch(&self, sender: &str, text: &str) {
        let (selector, body) = extract_selector(text);
        // Nearest-ASCII approximation so 7-bit-only mail paths keep
        // the text readable.
        let body = deunicode(body);

        info!(from = %sender, selector = %selector, "Dispatching message");

        let routes = self.routes.route(selector);
        if routes.is_empty() {
            warn!(selector = %selector, text = %body, "No route for message, dropping");
            return;
        }

        for route in routes {
            let routed_body = if route.include_sender() {
                format!("<{sender}>: {body}")
            } else {
                body.clone()
            };
            let parts = match split_into_parts(&routed_body, route.max_length) {
                Ok(parts) => parts,
                Err(e) => {
                    error!(recipient = %route.recipient, "Cannot split message: {e}");
                    continue;
                }
            };
            for part in parts {
                if let Err(e) = self.mailer.send(route, &part) {
                    error!(recipient = %route.recipient, "Send failed: {e}");
                }
            }
        }
    }
}
