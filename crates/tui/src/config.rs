use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                host: "https://webmail.mailcapsule.io".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn load_or_default(path: &PathBuf) -> Self {
        Self::load(path).unwrap_or_default()
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("CAPSULE_LINK_HOST") {
            if !host.is_empty() {
                self.service.host = host;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_service_section() {
        let config: Config =
            toml::from_str("[service]\nhost = \"http://localhost:8025\"\n").expect("parse config");
        assert_eq!(config.service.host, "http://localhost:8025");
    }

    #[test]
    fn default_points_at_the_public_host() {
        assert_eq!(
            Config::default().service.host,
            "https://webmail.mailcapsule.io"
        );
    }
}
