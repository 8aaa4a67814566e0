// Configuration module entry point
// Loads layered configuration and holds the per-process application state

mod state;
mod types;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File, FileFormat};
use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HealthConfig, HttpConfig, LoggingConfig, PerformanceConfig, RoutesConfig,
    ServerConfig, StoreBackend, StoreConfig,
};

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Precedence, lowest first: built-in defaults, the config file (optional),
    /// `NOTES__*` environment variables, then `PORT` and `DATABASE_URL`.
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = with_defaults()?
            .add_source(File::with_name(config_path).required(false))
            .add_source(Environment::with_prefix("NOTES").separator("__"))
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("store.url", std::env::var("DATABASE_URL").ok())?
            .build()?;

        settings.try_deserialize()
    }

    /// Build from defaults plus an inline TOML document
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        with_defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("logging.access_log_format", "combined")?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)?
        .set_default("performance.shutdown_timeout", 10)?
        .set_default("http.server_name", "notes-server/0.1")?
        .set_default("http.enable_cors", true)?
        .set_default("http.max_body_size", 1_048_576)? // 1MB
        .set_default("routes.static_dir", "build")?
        .set_default("routes.index_files", vec!["index.html"])?
        .set_default("routes.health.enabled", true)?
        .set_default("routes.health.liveness_path", "/healthz")?
        .set_default("routes.health.readiness_path", "/readyz")?
        .set_default("store.backend", "sqlite")?
        .set_default("store.url", "sqlite://notes.db?mode=rwc")?
        .set_default("store.max_connections", 5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serializes tests that touch process environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_KEYS: [&str; 4] = [
        "PORT",
        "DATABASE_URL",
        "NOTES__STORE__BACKEND",
        "NOTES__SERVER__PORT",
    ];

    /// Clears the variables it guards on creation and on drop
    struct EnvGuard;

    impl EnvGuard {
        fn new() -> Self {
            for key in ENV_KEYS {
                std::env::remove_var(key);
            }
            Self
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for key in ENV_KEYS {
                std::env::remove_var(key);
            }
        }
    }

    fn write_config(dir: &tempfile::TempDir) -> String {
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [server]
            port = 3001

            [performance]
            read_timeout = 5

            [store]
            backend = "sqlite"
            url = "sqlite://from-file.db"
            "#,
        )
        .unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_load_from_layers_env_over_file() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let _env = EnvGuard::new();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir);

        // File over defaults
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.server.port, 3001);
        assert_eq!(cfg.performance.read_timeout, 5);
        assert_eq!(cfg.store.backend, StoreBackend::Sqlite);
        assert_eq!(cfg.store.url, "sqlite://from-file.db");

        // NOTES__* over file
        std::env::set_var("NOTES__STORE__BACKEND", "memory");
        std::env::set_var("NOTES__SERVER__PORT", "5000");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.store.backend, StoreBackend::Memory);
        assert_eq!(cfg.server.port, 5000);

        // PORT and DATABASE_URL over everything
        std::env::set_var("PORT", "4000");
        std::env::set_var("DATABASE_URL", "sqlite::memory:");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.server.port, 4000);
        assert_eq!(cfg.store.url, "sqlite::memory:");
        assert_eq!(cfg.store.backend, StoreBackend::Memory);
        assert_eq!(cfg.performance.read_timeout, 5);
    }

    #[test]
    fn test_load_from_without_file_uses_defaults() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let _env = EnvGuard::new();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");

        let cfg = Config::load_from(missing.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.store.backend, StoreBackend::Sqlite);

        std::env::set_var("PORT", "3001");
        let cfg = Config::load_from(missing.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 3001);
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert!(cfg.http.enable_cors);
        assert_eq!(cfg.store.backend, StoreBackend::Sqlite);
        assert_eq!(cfg.store.url, "sqlite://notes.db?mode=rwc");
        assert_eq!(cfg.routes.static_dir.as_deref(), Some("build"));
        assert_eq!(cfg.routes.index_files, vec!["index.html".to_string()]);
        assert_eq!(cfg.routes.health.readiness_path, "/readyz");
        assert_eq!(cfg.performance.max_connections, None);
        assert_eq!(cfg.logging.access_log_file, None);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            [server]
            port = 3001
            workers = 2

            [store]
            backend = "memory"

            [performance]
            max_connections = 64
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.port, 3001);
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.store.backend, StoreBackend::Memory);
        assert_eq!(cfg.performance.max_connections, Some(64));
        assert_eq!(cfg.performance.read_timeout, 30);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let result = Config::from_toml_str("[store]\nbackend = \"mongo\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::from_toml_str("[server]\nhost = \"127.0.0.1\"\nport = 9000\n").unwrap();
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:9000".parse::<SocketAddr>().unwrap()
        );

        let bad = Config::from_toml_str("[server]\nhost = \"not a host\"\n").unwrap();
        assert!(bad.get_socket_addr().is_err());
    }
}
