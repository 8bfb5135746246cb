//! Application settings, read from an optional TOML file and overridden by
//! `SHOPKEEP_*` environment variables (`SHOPKEEP_SERVER__PORT=8080`).
//!
//! ```toml
//! [app]
//! level = "debug"
//!
//! [server]
//! bind = "0.0.0.0"
//! port = 3000
//!
//! [database]
//! sqlite = "shopkeep.db" # or, at top level, database = "memory"
//! ```
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    /// `tracing` level applied to the workspace crates.
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("shopkeep.db".to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub database: Database,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("SHOPKEEP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_file() {
        let settings = Settings::new("does-not-exist").unwrap();
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.server.bind, "127.0.0.1");
        assert!(matches!(settings.database, Database::Sqlite(ref p) if p == "shopkeep.db"));
    }

    #[test]
    fn sqlite_path_from_table() {
        let settings: Settings = Config::builder()
            .add_source(config::File::from_str(
                "[database]\nsqlite = \"/var/lib/shop.db\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(matches!(settings.database, Database::Sqlite(ref p) if p == "/var/lib/shop.db"));
        assert_eq!(settings.app.level, "info");
    }

    #[test]
    fn toml_overrides_defaults() {
        let settings: Settings = Config::builder()
            .add_source(config::File::from_str(
                "database = \"memory\"\n[app]\nlevel = \"debug\"\n[server]\nport = 8080\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.bind, "127.0.0.1");
        assert!(matches!(settings.database, Database::Memory));
    }
}
