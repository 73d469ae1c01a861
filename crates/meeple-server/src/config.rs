use std::path::PathBuf;

use anyhow::{Context, Result};

/// Where a startup reseed reads its rows from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSource {
    /// The dataset bundled with `meeple-db`.
    Test,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub seed: Option<SeedSource>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = lookup("MEEPLE_DB_PATH").unwrap_or_else(|| "meeple.db".into());
        let host = lookup("MEEPLE_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("MEEPLE_PORT")
            .unwrap_or_else(|| "9090".into())
            .parse()
            .context("MEEPLE_PORT must be a port number")?;

        let seed = lookup("MEEPLE_SEED")
            .filter(|v| !v.is_empty())
            .map(|v| match v.as_str() {
                "test" => SeedSource::Test,
                _ => SeedSource::File(PathBuf::from(v)),
            });

        Ok(Self {
            db_path: PathBuf::from(db_path),
            host,
            port,
            seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("meeple.db"));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn seed_sources() {
        let config = load(&[("MEEPLE_SEED", "test")]).unwrap();
        assert_eq!(config.seed, Some(SeedSource::Test));

        let config = load(&[("MEEPLE_SEED", "data/dev.json")]).unwrap();
        assert_eq!(config.seed, Some(SeedSource::File(PathBuf::from("data/dev.json"))));
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(load(&[("MEEPLE_PORT", "ninety")]).is_err());
        assert_eq!(load(&[("MEEPLE_PORT", "3000")]).unwrap().port, 3000);
    }
}
