// loan-document-service/src/config.rs

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Where a locally installed Chrome usually lives, tried in order.
#[cfg(target_os = "windows")]
const DEFAULT_CHROME_CHANNEL_PATHS: &[&str] = &["C:\\Program Files\\Google\\Chrome\\Application\\chrome.exe"];

#[cfg(target_os = "macos")]
const DEFAULT_CHROME_CHANNEL_PATHS: &[&str] = &["/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const DEFAULT_CHROME_CHANNEL_PATHS: &[&str] = &["/usr/bin/google-chrome", "/usr/bin/chromium"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub server: ServerConfig,
    pub browser: BrowserConfig,
    pub assets: AssetConfig,
    #[serde(default)]
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Explicit chromium binary. When unset the first existing entry of
    /// `chrome_channel_paths` is used, then whatever `headless_chrome` can
    /// discover.
    pub executable_path: Option<PathBuf>,
    #[serde(default)]
    pub chrome_channel_paths: Vec<PathBuf>,
    pub sandbox: bool,
    pub max_concurrent: usize,
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetConfig {
    pub logo_url: String,
    pub header_image_url: String,
    pub footer_image_url: String,
    pub image_fetch_timeout_secs: u64,
    /// Larger images are not inlined.
    pub max_image_bytes: usize,
    pub inline_images: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateConfig {
    /// Directory whose `<name>.html.hbs` files replace the built-in templates.
    pub path: Option<PathBuf>,
}

impl BrowserConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl AssetConfig {
    pub fn image_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.image_fetch_timeout_secs)
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            // Start with default values
            .set_default("service.name", "loan-document-service")?
            .set_default("service.log_level", "info")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("browser.sandbox", false)?
            .set_default("browser.max_concurrent", 2)?
            .set_default("browser.idle_timeout_secs", 60)?
            .set_default(
                "browser.chrome_channel_paths",
                DEFAULT_CHROME_CHANNEL_PATHS.to_vec(),
            )?
            .set_default(
                "assets.logo_url",
                "https://res.cloudinary.com/dk4cqoxcp/image/upload/v1768554878/seeds-logo.png",
            )?
            .set_default(
                "assets.header_image_url",
                "https://res.cloudinary.com/dk4cqoxcp/image/upload/v1768555572/seeds-header-pattern.png",
            )?
            .set_default(
                "assets.footer_image_url",
                "https://res.cloudinary.com/dk4cqoxcp/image/upload/v1768557489/seeds-footer-pattern-2.png",
            )?
            .set_default("assets.image_fetch_timeout_secs", 8)?
            .set_default("assets.max_image_bytes", 5 * 1024 * 1024)?
            .set_default("assets.inline_images", true)?
            // Load from config file if it exists
            .add_source(File::with_name("config").required(false))
            // Override with environment variables (e.g., SERVICE__SERVER__PORT)
            .add_source(Environment::with_prefix("SERVICE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        service: ServiceConfig {
            name: "loan-document-service".to_string(),
            log_level: "debug".to_string(),
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        browser: BrowserConfig {
            executable_path: None,
            chrome_channel_paths: Vec::new(),
            sandbox: false,
            max_concurrent: 1,
            idle_timeout_secs: 30,
        },
        assets: AssetConfig {
            logo_url: "https://assets.example.test/logo.png".to_string(),
            header_image_url: String::new(),
            footer_image_url: String::new(),
            image_fetch_timeout_secs: 1,
            max_image_bytes: 1024 * 1024,
            inline_images: true,
        },
        templates: TemplateConfig { path: None },
    }
}
