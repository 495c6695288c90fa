//! Environment-based configuration.

use std::env;
use std::path::PathBuf;

/// Runtime configuration, read from the environment.
///
/// - `FOLIO_WORKING_ROOT`: parent directory for scoped extraction
///   directories (defaults to a `folio` directory under the system
///   temp location)
/// - `FOLIO_DATABASE`: path of the SQLite database file
#[derive(Debug, Clone)]
pub struct Config {
    pub working_root: PathBuf,
    pub database_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let working_root = env::var_os("FOLIO_WORKING_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join("folio"));
        let database_path = env::var_os("FOLIO_DATABASE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("folio.db"));

        Self {
            working_root,
            database_path,
        }
    }
}
