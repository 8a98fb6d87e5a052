//! Error types for the gateway.

/// Top-level error type for the gateway.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),
}

/// Configuration-related errors. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read routes file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse routes file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Serial transport errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to open device {device}: {source}")]
    Open {
        device: String,
        source: serialport::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Chat-script execution errors.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// An enforced step got a response other than the one it expects.
    /// Aborts the whole run.
    #[error("Protocol mismatch on {command}: expected '{expected}', got '{actual}'")]
    ProtocolMismatch {
        command: String,
        expected: String,
        actual: String,
    },

    /// The stream ended (or the read timed out) while a command was
    /// waiting for its response.
    #[error("Stream closed while waiting for response to {command}")]
    Closed { command: String },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Message splitting errors.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    /// maxLength reserves 4 characters for the "i/total " part prefix, so
    /// a message that needs splitting cannot fit under maxLength <= 4.
    #[error("maxLength {max_length} leaves no room for part payloads")]
    MaxLengthTooSmall { max_length: usize },
}

/// Mail delivery errors. Logged per part; never abort sibling deliveries.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP send to {server} failed: {reason}")]
    Smtp { server: String, reason: String },
}

/// Result type alias for the gateway.
pub type Result<T> = std::result::Result<T, Error>;
