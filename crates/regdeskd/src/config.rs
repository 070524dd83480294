//! Daemon configuration.
//!
//! Loaded from an optional TOML file; every section and key is optional
//! and falls back to the defaults below. CLI flags override the file.
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1"
//! port = 8080
//!
//! [storage]
//! data_dir = "/var/lib/regdesk"
//!
//! [export]
//! pdf_title = "Training Registrations Report"
//!
//! [dashboard]
//! page_size = 25
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub export: ExportConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub pdf_title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pdf_title: regdesk_report::ReportOptions::default().pdf_title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub page_size: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: regdesk_api::DEFAULT_PAGE_SIZE,
        }
    }
}

/// Flags that take precedence over the file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub bind: Option<IpAddr>,
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Read `path` if given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(text)?;
        if config.dashboard.page_size == 0 {
            anyhow::bail!("dashboard.page_size must be at least 1");
        }
        Ok(config)
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(bind) = overrides.bind {
            self.server.bind = bind;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(dir) = overrides.data_dir {
            self.storage.data_dir = dir;
        }
        self
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.bind, self.server.port)
    }

    pub fn db_path(&self) -> PathBuf {
        self.storage.data_dir.join("regdesk.redb")
    }

    pub fn router_options(&self) -> regdesk_api::RouterOptions {
        regdesk_api::RouterOptions {
            report: regdesk_report::ReportOptions {
                pdf_title: self.export.pdf_title.clone(),
            },
            dashboard_page_size: self.dashboard.page_size,
        }
    }
}
