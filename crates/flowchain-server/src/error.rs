use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required configuration: set the {env_var} environment variable")]
    MissingEnvVar { env_var: String },

    #[error(transparent)]
    Other(#[from] config::ConfigError),
}

/// Map a settings field path like `gateway.api_key` to the environment
/// variable that supplies it.
pub fn to_env_var(field: &str) -> String {
    format!("FLOWCHAIN_{}", field.replace('.', "__").to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_env_var() {
        assert_eq!(to_env_var("gateway.api_key"), "FLOWCHAIN_GATEWAY__API_KEY");
        assert_eq!(to_env_var("server.port"), "FLOWCHAIN_SERVER__PORT");
    }
}
