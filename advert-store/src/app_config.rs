use advert_selection::SelectionStrategy;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Memory,
    Redis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// JSON catalog loaded into the memory backend, or seeded into Redis
    pub catalog_path: Option<String>,
    pub redis_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SelectionConfig {
    #[serde(default)]
    pub strategy: SelectionStrategy,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `ADVERT_SERVER__PORT=9090`
            .add_source(config::Environment::with_prefix("ADVERT").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
