//! Site configuration with layered loading.
//!
//! The asset lists, the site metadata, and the worker script path are all
//! deployment data, not code; they arrive here as configuration loaded
//! with figment from multiple sources:
//!
//! 1. Environment variables (ELRAYAN_*)
//! 2. TOML config file (if ELRAYAN_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::site::{Branding, ContactLink, ContactPhone, Contacts};

mod validation;

pub use validation::ConfigError;

/// Site configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (ELRAYAN_*)
/// 2. TOML config file (if ELRAYAN_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Release version tag. A stored tag differing from this one triggers a
    /// rebuild of the cached site-data blob.
    #[serde(default = "default_version")]
    pub version: String,

    /// Path to the SQLite database shared by the gate and the worker.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Site origin; requests matching it are static traffic, everything
    /// else is dynamic.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Worker script path handed to the registrar on every page load.
    #[serde(default = "default_worker_script")]
    pub worker_script: String,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Same-origin assets precached during install. All-or-nothing: a
    /// missing entry here is a build error and fails the install.
    #[serde(default = "default_static_assets")]
    pub static_assets: Vec<String>,

    /// Cross-origin assets warmed during install, best effort.
    #[serde(default = "default_cdn_assets")]
    pub cdn_assets: Vec<String>,

    /// Assets the gate emits preload/prefetch hints for after a rebuild.
    #[serde(default = "default_critical_assets")]
    pub critical_assets: Vec<String>,

    /// Contact channels baked into the cached-data blob.
    #[serde(default = "default_contacts")]
    pub contacts: Contacts,

    /// Branding baked into the cached-data blob.
    #[serde(default = "default_branding")]
    pub branding: Branding,
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./elrayan-offline.sqlite")
}

fn default_origin() -> String {
    "https://elrayan.site".into()
}

fn default_worker_script() -> String {
    "/offline-worker.js".into()
}

fn default_user_agent() -> String {
    "elrayan-offline/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_redirects() -> usize {
    5
}

fn default_static_assets() -> Vec<String> {
    [
        "/",
        "/index.html",
        "/styles.css",
        "/app.js",
        "/manifest.json",
        "/icons/icon-192.png",
        "/icons/icon-512.png",
    ]
    .map(String::from)
    .to_vec()
}

fn default_cdn_assets() -> Vec<String> {
    [
        "https://fonts.googleapis.com/css2?family=Cairo:wght@400;700&display=swap",
        "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css",
    ]
    .map(String::from)
    .to_vec()
}

fn default_critical_assets() -> Vec<String> {
    ["/styles.css", "/app.js", "/icons/icon-192.png"].map(String::from).to_vec()
}

fn default_contacts() -> Contacts {
    Contacts {
        telegram: vec![
            ContactLink { name: "El Rayan Channel".into(), url: "https://t.me/elrayan".into() },
            ContactLink { name: "El Rayan Group".into(), url: "https://t.me/elrayan_group".into() },
        ],
        whatsapp: ContactLink { name: "WhatsApp".into(), url: "https://wa.me/201001234567".into() },
        phones: vec![
            ContactPhone { name: "Sales".into(), number: "+20 100 123 4567".into() },
            ContactPhone { name: "Support".into(), number: "+20 100 765 4321".into() },
        ],
        location: "https://maps.google.com/?q=El+Rayan+Store".into(),
    }
}

fn default_branding() -> Branding {
    Branding { name: "El Rayan".into(), subtitle: "Home appliances & more".into() }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            db_path: default_db_path(),
            origin: default_origin(),
            worker_script: default_worker_script(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            static_assets: default_static_assets(),
            cdn_assets: default_cdn_assets(),
            critical_assets: default_critical_assets(),
            contacts: default_contacts(),
            branding: default_branding(),
        }
    }
}

impl SiteConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or validation
    /// fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("ELRAYAN_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("ELRAYAN_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
