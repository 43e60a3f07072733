//! Catalog store configuration.

use std::env;

/// Connection parameters for the section catalog.
///
/// Defaults target a local development database; every field can be
/// overridden by a `USC_DB_*` environment variable and again by the
/// matching CLI flag.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database name
    pub name: String,
    /// Login role
    pub user: String,
    /// Login password
    pub password: String,
    /// Server hostname
    pub host: String,
    /// Server port
    pub port: u16,
    /// Semester code the catalog is queried for (e.g. "20253")
    pub semester: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            name: "usc_sched".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            host: "localhost".to_string(),
            port: 5432,
            semester: "20253".to_string(),
        }
    }
}

impl DbConfig {
    /// Load configuration, applying `USC_DB_*` environment overrides on
    /// top of the defaults.
    ///
    /// # Environment Variables
    /// - `USC_DB_NAME`: database name (default: `usc_sched`)
    /// - `USC_DB_USER`: login role (default: `postgres`)
    /// - `USC_DB_PASSWORD`: login password (default: empty)
    /// - `USC_DB_HOST`: server hostname (default: `localhost`)
    /// - `USC_DB_PORT`: server port (default: `5432`); non-numeric
    ///   values are ignored
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(name) = env::var("USC_DB_NAME") {
            if !name.is_empty() {
                config.name = name;
            }
        }
        if let Ok(user) = env::var("USC_DB_USER") {
            if !user.is_empty() {
                config.user = user;
            }
        }
        if let Ok(password) = env::var("USC_DB_PASSWORD") {
            if !password.is_empty() {
                config.password = password;
            }
        }
        if let Ok(host) = env::var("USC_DB_HOST") {
            if !host.is_empty() {
                config.host = host;
            }
        }
        if let Ok(port) = env::var("USC_DB_PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }
        config
    }

    /// libpq-style connection string for this configuration.
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            self.host, self.port, self.name, self.user, self.password
        )
    }
}
