use config::{Config, Environment};
use flowchain::gateway::openai::{self, OpenAiGatewayConfig};
use serde::Deserialize;
use std::net::SocketAddr;

use crate::error::{to_env_var, ConfigError};

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Other(config::ConfigError::Message(format!(
                "invalid server address: {e}"
            ))))
    }
}

#[derive(Debug, Deserialize)]
pub struct GatewaySettings {
    #[serde(default = "default_gateway_host")]
    pub host: String,
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
}

impl GatewaySettings {
    pub fn into_config(self) -> OpenAiGatewayConfig {
        OpenAiGatewayConfig {
            host: self.host,
            api_key: self.api_key,
            model: self.model,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub gateway: GatewaySettings,
}

impl Settings {
    /// Load settings from `FLOWCHAIN_`-prefixed environment variables,
    /// e.g. `FLOWCHAIN_GATEWAY__API_KEY`, `FLOWCHAIN_SERVER__PORT`.
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("FLOWCHAIN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        match config.try_deserialize::<Self>() {
            Ok(settings) => Ok(settings),
            Err(err) => {
                tracing::debug!("configuration error: {:?}", &err);

                // Surface missing fields as the env var the operator must set
                let error_str = err.to_string();
                if error_str.starts_with("missing field") {
                    let field = error_str
                        .trim_start_matches("missing field `")
                        .trim_end_matches('`');
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else if let config::ConfigError::NotFound(field) = &err {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else {
                    Err(ConfigError::Other(err))
                }
            }
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_gateway_host() -> String {
    openai::DEFAULT_HOST.to_string()
}

fn default_model() -> String {
    openai::DEFAULT_MODEL.to_string()
}
