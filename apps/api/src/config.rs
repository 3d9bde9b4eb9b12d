use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use services::CacheConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application configuration composed from shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub cache: CacheConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let cache = CacheConfig::from_env()?; // Uses defaults: CACHE_TTL_SECS=30

        Ok(Self {
            app: app_info!(),
            server,
            cache,
            environment,
        })
    }
}
