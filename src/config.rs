//! Routes-file loading and fixed transport parameters.

use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::routing::Route;

/// Modem line speed.
pub const BAUD_RATE: u32 = 115_200;

/// Per-read timeout on the serial port.
pub const READ_TIMEOUT: Duration = Duration::from_secs(3);

/// Load the route records from a JSON file.
///
/// The file is a JSON array of route objects with camelCase keys
/// (selector, sender, recipient, user, password, server, port,
/// maxLength, withSender). Any IO or parse failure is a fatal startup
/// error.
pub fn load_routes(path: &Path) -> Result<Vec<Route>, ConfigError> {
    let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_routes(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_camel_case_records() {
        let file = write_routes(
            r#"[{
                "selector": "ops",
                "sender": "modem@example.com",
                "recipient": "oncall@example.com",
                "user": "user",
                "password": "secret",
                "server": "smtp.example.com",
                "port": 587,
                "maxLength": 120,
                "withSender": 1
            }]"#,
        );
        let routes = load_routes(file.path()).unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].selector, "ops");
        assert_eq!(routes[0].max_length, 120);
        assert!(routes[0].include_sender());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let file = write_routes("not json");
        let err = load_routes(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_routes(Path::new("/nonexistent/routes.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
