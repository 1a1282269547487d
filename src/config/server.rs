use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Upper bound on the declared size of a single CAD file in a commit manifest.
    pub max_file_size: i64,
    /// Accepted CAD file extensions, compared case-insensitively.
    pub allowed_extensions: Vec<String>,
    /// Browser origins allowed to call the API. `"*"` allows any origin.
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Reads a TOML config file. Missing keys fall back to their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid listen address: {e}")))
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("cadhub.db")
    }

    #[must_use]
    pub fn allows_extension(&self, file_type: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(file_type))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            max_file_size: 100 * 1024 * 1024,
            allowed_extensions: [".sldprt", ".sldasm", ".slddrw", ".step", ".iges"]
                .into_iter()
                .map(String::from)
                .collect(),
            allowed_origins: [
                "http://localhost:3000",
                "http://localhost:3001",
                "https://solidworks-pdm.vercel.app",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}
