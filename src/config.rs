use std::{env, fmt::Display, net::SocketAddr, path::PathBuf, str::FromStr};

use tracing::{info, warn};

use crate::error::ConfigError;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_STORE_FILE: &str = "links_db.txt";

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub store_file: PathBuf,
}

impl Config {
    /// Reads the process environment. Call `dotenv().ok()` first to pick up a `.env` file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            addr: try_load(&lookup, "SERVER_ADDR", DEFAULT_ADDR)?,
            store_file: try_load(&lookup, "STORE_FILE", DEFAULT_STORE_FILE)?,
        })
    }

    /// Name under which the store file is served, e.g. `links_db.txt`.
    pub fn store_file_name(&self) -> String {
        self.store_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_STORE_FILE.to_string())
    }
}

pub(crate) fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<String> {
        move |key: &str| vars.get(key).map(|v| v.to_string())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.addr, DEFAULT_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(config.store_file, PathBuf::from(DEFAULT_STORE_FILE));
        assert_eq!(config.store_file_name(), "links_db.txt");
    }

    #[test]
    fn overrides_are_parsed() {
        let mut vars = HashMap::new();
        vars.insert("SERVER_ADDR", "127.0.0.1:9000");
        vars.insert("STORE_FILE", "/var/lib/linkboard/links.json");
        let config = Config::from_lookup(lookup_in(vars)).unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.store_file_name(), "links.json");
    }

    #[test]
    fn admin_digest_does_not_concern_the_server() {
        let mut vars = HashMap::new();
        vars.insert("ADMIN_DIGEST", "abcd");
        assert!(Config::from_lookup(lookup_in(vars)).is_ok());
    }

    #[test]
    fn bad_address_is_rejected() {
        let mut vars = HashMap::new();
        vars.insert("SERVER_ADDR", "not-an-address");
        let err = Config::from_lookup(lookup_in(vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SERVER_ADDR", .. }));
    }
}
