use serde::{Deserialize, Serialize};
use std::{net::IpAddr, path::PathBuf};

const DEFAULT_CONFIG_FILE: &str = include_str!("lonb.default.toml");

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub db: Option<Db>,
    pub webserver: Option<WebServer>,
    pub auth: Option<Auth>,
    pub photos: Option<Photos>,
    pub geocoding: Option<Geocoding>,
}

impl Config {
    pub fn try_default() -> Result<Self, toml::de::Error> {
        toml::from_str(DEFAULT_CONFIG_FILE)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DbBackend {
    Sqlite,
    File,
    Memory,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Db {
    pub backend: Option<DbBackend>,
    pub connection_sqlite: Option<String>,
    pub connection_pool_size: Option<u32>,
    pub file_dir: Option<PathBuf>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WebServer {
    pub address: Option<IpAddr>,
    pub port: Option<u16>,
    pub cors: Option<bool>,
    pub frontend_url: Option<String>,
    pub environment: Option<Environment>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Environment {
    Production,
    Development,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Auth {
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub google_callback_url: Option<String>,
    pub jwt_secret: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Photos {
    pub folder: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Geocoding {
    pub enabled: Option<bool>,
    pub language: Option<String>,
    pub google_api_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_config_from_file() {
        let cfg = Config::try_default().unwrap();
        let db = cfg.db.unwrap();
        assert_eq!(Some(DbBackend::Sqlite), db.backend);
        assert_eq!(Some(10), db.connection_pool_size);
        let webserver = cfg.webserver.unwrap();
        assert_eq!(Some(5000), webserver.port);
        assert_eq!(Some(Environment::Production), webserver.environment);
        assert!(cfg.auth.unwrap().google_client_id.is_none());
        assert_eq!(Some("tr"), cfg.geocoding.unwrap().language.as_deref());
    }

    #[test]
    fn parse_partial_config() {
        let cfg: Config = toml::from_str(
            r#"
            [db]
            backend = "file"
            file-dir = "/var/lib/lonb"
            "#,
        )
        .unwrap();
        let db = cfg.db.unwrap();
        assert_eq!(Some(DbBackend::File), db.backend);
        assert_eq!(Some(PathBuf::from("/var/lib/lonb")), db.file_dir);
        assert!(db.connection_sqlite.is_none());
        assert!(cfg.webserver.is_none());
    }

    #[test]
    fn reject_unknown_backend() {
        assert!(toml::from_str::<Config>("[db]\nbackend = \"postgres\"").is_err());
    }
}
