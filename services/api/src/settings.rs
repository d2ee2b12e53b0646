//! HTTP server settings

use serde::Deserialize;

/// Server configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind (default: "0.0.0.0")
    pub host: String,
    /// Port to listen on (default: 3001)
    pub port: u16,
}

impl ServerConfig {
    /// Load the server configuration from defaults and the environment
    ///
    /// # Environment Variables
    /// - `SERVER_HOST`: Interface to bind (default: "0.0.0.0")
    /// - `SERVER_PORT`: Port to listen on (default: 3001)
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3001_i64)?
            .add_source(config::Environment::with_prefix("SERVER").try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Address to bind the listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_server_config_defaults() {
        unsafe {
            std::env::remove_var("SERVER_HOST");
            std::env::remove_var("SERVER_PORT");
        }

        let config = ServerConfig::load().unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3001);
        assert_eq!(config.bind_address(), "0.0.0.0:3001");
    }

    #[test]
    #[serial]
    fn test_server_config_from_env() {
        unsafe {
            std::env::set_var("SERVER_HOST", "127.0.0.1");
            std::env::set_var("SERVER_PORT", "8080");
        }

        let config = ServerConfig::load().unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");

        unsafe {
            std::env::remove_var("SERVER_HOST");
            std::env::remove_var("SERVER_PORT");
        }
    }
}
