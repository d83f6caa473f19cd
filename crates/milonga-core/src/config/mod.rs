use anyhow::Result;
use config::Config;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub search: SearchConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u8,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchBackend {
    Elasticsearch,
    Memory,
}

#[derive(Clone, Deserialize)]
pub struct SearchConfig {
    pub backend: SearchBackend,
    pub urls: Vec<String>,
    pub index: String,
    pub page_size: u32,
    pub refresh_on_write: bool,
    pub timeout_secs: u64,
    pub nearest_first: bool,
    pub username: Option<String>,
    pub password: Option<String>,
}

// Hand-written so the index password never ends up in the startup log.
impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("backend", &self.backend)
            .field("urls", &self.urls)
            .field("index", &self.index)
            .field("page_size", &self.page_size)
            .field("refresh_on_write", &self.refresh_on_write)
            .field("timeout_secs", &self.timeout_secs)
            .field("nearest_first", &self.nearest_first)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the bind address as a string in the format "host:port".
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional `config.toml`.
    ///
    /// Nested keys use a double underscore in the environment, e.g.
    /// `SEARCH__PAGE_SIZE=25` or `DATABASE__URL=postgres://...`.
    /// `SEARCH__URLS` accepts a comma separated list.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8181)?
            .set_default("database.max_connections", 4)?
            .set_default("database.run_migrations", true)?
            .set_default("search.backend", "elasticsearch")?
            .set_default("search.urls", vec!["http://localhost:9200"])?
            .set_default("search.index", "events")?
            .set_default("search.page_size", 10)?
            .set_default("search.refresh_on_write", true)?
            .set_default("search.timeout_secs", 10)?
            .set_default("search.nearest_first", false)?
            .set_default("logging.level", "debug")?
            // Env file
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("search.urls")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
