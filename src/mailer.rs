//! Outbound mail: the delivery seam and its SMTP implementation.

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::error::DeliveryError;
use crate::routing::Route;

/// Delivery seam for the dispatcher; a test double records calls
/// instead of talking SMTP.
pub trait Mailer: Send + Sync {
    fn send(&self, route: &Route, body: &str) -> Result<(), DeliveryError>;
}

/// Sends each part through the route's SMTP relay with lettre.
pub struct SmtpMailer;

impl SmtpMailer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SmtpMailer {
    fn default() -> Self {
        Self::new()
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, route: &Route, body: &str) -> Result<(), DeliveryError> {
        let message = build_message(route, body)?;

        let creds = Credentials::new(route.user.clone(), route.password.clone());
        let transport = SmtpTransport::relay(&route.server)
            .map_err(|e| DeliveryError::Smtp {
                server: route.server.clone(),
                reason: format!("SMTP relay error: {e}"),
            })?
            .port(route.port)
            .credentials(creds)
            .build();

        transport.send(&message).map_err(|e| DeliveryError::Smtp {
            server: route.server.clone(),
            reason: format!("SMTP send failed: {e}"),
        })?;

        tracing::info!(recipient = %route.recipient, "Mail sent");
        Ok(())
    }
}

/// Build the outbound message: From/To/Subject/Date headers, then the
/// body. The Subject duplicates the body text so the whole SMS is
/// visible in a mailbox listing.
fn build_message(route: &Route, body: &str) -> Result<Message, DeliveryError> {
    let from: Mailbox = route
        .sender
        .parse()
        .map_err(|e| DeliveryError::InvalidAddress {
            address: route.sender.clone(),
            reason: format!("{e}"),
        })?;
    let to: Mailbox = route
        .recipient
        .parse()
        .map_err(|e| DeliveryError::InvalidAddress {
            address: route.recipient.clone(),
            reason: format!("{e}"),
        })?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(body)
        .date_now()
        .body(body.to_string())
        .map_err(|e| DeliveryError::Build(e.to_string()))
}
