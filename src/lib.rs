//! GSM modem SMS-to-email gateway core.

pub mod chat;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod mailer;
pub mod parse;
pub mod routing;
pub mod split;
pub mod transport;
