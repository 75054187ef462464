use crate::domain::services::client_validation::PhonePolicy;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: Server,
    pub db: Db,
    #[serde(default)]
    pub cors: Cors,
    #[serde(default)]
    pub validation: Validation,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

/// Which record store backs the service.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Db {
    #[serde(default)]
    pub backend: StorageBackend,
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Cors {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Validation {
    #[serde(default)]
    pub phone_policy: PhonePolicy,
}

impl Settings {
    /// Loopback, ephemeral port, in-memory store, no CORS and default validation.
    pub fn in_memory() -> Self {
        Self {
            server: Server {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            db: Db {
                backend: StorageBackend::Memory,
                url: String::new(),
                max_connections: 1,
                run_migrations: false,
            },
            cors: Cors::default(),
            validation: Validation::default(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_run_migrations() -> bool {
    true
}

/// Load settings from `config/default.toml`, `config/<env>.toml`, and env overrides.
pub fn load() -> Result<Settings, config::ConfigError> {
    let env_name = std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());
    config::Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{env_name}")).required(false))
        .add_source(
            config::Environment::with_prefix("CLIENTS")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}
