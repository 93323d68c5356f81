//! Run configuration: client list and environment overrides.
//!
//! The default client list is embedded from `clients.toml`; `--clients`
//! points at a file with the same `[[clients]]` layout.

use std::path::{Path, PathBuf};

use quake_risk_analytics_models::ClientLocation;
use serde::Deserialize;

/// Overrides the geocoder `User-Agent`.
pub const USER_AGENT_ENV: &str = "QUAKE_RISK_USER_AGENT";

/// Overrides the output directory.
pub const OUTPUT_DIR_ENV: &str = "QUAKE_RISK_OUTPUT_DIR";

/// Directory the dashboard reads from.
pub const DEFAULT_OUTPUT_DIR: &str = "dashboard";

const DEFAULT_CLIENTS_TOML: &str = include_str!("../clients.toml");

/// Errors loading run configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The client file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The client file is not valid TOML or lacks required fields.
    #[error("Invalid client list: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Deserialize)]
struct ClientsFile {
    #[serde(default)]
    clients: Vec<ClientLocation>,
}

/// Parses a `[[clients]]` TOML document.
///
/// # Errors
///
/// Returns [`ConfigError::Toml`] if the document is malformed.
pub fn parse_clients(toml_str: &str) -> Result<Vec<ClientLocation>, ConfigError> {
    let file: ClientsFile = toml::de::from_str(toml_str)?;
    Ok(file.clients)
}

/// Loads clients from `path`, or the embedded default list.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed.
pub fn load_clients(path: Option<&Path>) -> Result<Vec<ClientLocation>, ConfigError> {
    let Some(path) = path else {
        return parse_clients(DEFAULT_CLIENTS_TOML);
    };

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let clients = parse_clients(&contents)?;
    log::info!("Loaded {} clients from {}", clients.len(), path.display());
    Ok(clients)
}

/// Flag value, then [`OUTPUT_DIR_ENV`], then [`DEFAULT_OUTPUT_DIR`].
#[must_use]
pub fn output_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var(OUTPUT_DIR_ENV).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
}

/// Flag value, then [`USER_AGENT_ENV`]. `None` keeps the registry default.
#[must_use]
pub fn user_agent(flag: Option<String>) -> Option<String> {
    flag.or_else(|| std::env::var(USER_AGENT_ENV).ok())
        .filter(|ua| !ua.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_clients_parse() {
        let clients = load_clients(None).unwrap();
        assert_eq!(clients.len(), 7);
        assert_eq!(clients[1].name, "City Hall");
        assert!(clients.iter().all(|c| !c.address.is_empty()));
    }

    #[test]
    fn parses_custom_client_list() {
        let clients = parse_clients(
            r#"
            [[clients]]
            name = "Depot"
            address = "100 Main St, Boise, ID"
            "#,
        )
        .unwrap();
        assert_eq!(
            clients,
            vec![ClientLocation {
                name: "Depot".to_string(),
                address: "100 Main St, Boise, ID".to_string(),
            }]
        );
    }

    #[test]
    fn empty_document_has_no_clients() {
        assert!(parse_clients("").unwrap().is_empty());
    }

    #[test]
    fn client_without_address_is_rejected() {
        let err = parse_clients("[[clients]]\nname = \"Depot\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_clients(Some(Path::new("/nonexistent/clients.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn output_dir_flag_wins() {
        assert_eq!(
            output_dir(Some(PathBuf::from("out"))),
            PathBuf::from("out")
        );
    }

    #[test]
    fn user_agent_flag_wins_and_blank_is_ignored() {
        assert_eq!(user_agent(Some("me/1.0".to_string())).as_deref(), Some("me/1.0"));
        assert_eq!(user_agent(Some("  ".to_string())), None);
    }
}
