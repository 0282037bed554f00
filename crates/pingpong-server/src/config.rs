use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    /// Single allowed browser origin; `None` means permissive CORS.
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = get("DATABASE_URL").unwrap_or_else(|| "./data/dev.db".into()).into();
        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = get("PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("PORT must be a number between 0 and 65535")?;
        let cors_origin = get("CORS_ORIGIN").filter(|origin| !origin.trim().is_empty());

        Ok(Self {
            db_path,
            host,
            port,
            cors_origin,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("./data/dev.db"));
        assert_eq!(cfg.port, 3000);
        assert!(cfg.cors_origin.is_none());
        assert_eq!(cfg.addr().unwrap().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("DATABASE_URL", "/tmp/pp.db"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("CORS_ORIGIN", "http://localhost:5173"),
        ])
        .unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/pp.db"));
        assert_eq!(cfg.addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.cors_origin.as_deref(), Some("http://localhost:5173"));
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(config(&[("PORT", "http")]).is_err());
    }
}
