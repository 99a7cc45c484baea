// loan-document-service/src/renderers/browser.rs

use crate::config::BrowserConfig;
use crate::error::{DocumentError, Result};
use headless_chrome::{Browser, LaunchOptions};
use std::ffi::OsStr;
use std::path::PathBuf;
use tracing::{debug, info};

/// Flags every browser is started with. The service usually runs in a
/// container without a usable sandbox or a large /dev/shm.
const BASE_ARGS: [&str; 5] = [
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--hide-scrollbars",
    "--disable-web-security",
];

/// Picks the chromium binary: the configured path, then the first existing
/// channel path, then whatever `headless_chrome` discovers on its own.
pub fn resolve_executable(config: &BrowserConfig) -> Result<PathBuf> {
    if let Some(path) = &config.executable_path {
        return Ok(path.clone());
    }

    if let Some(path) = config
        .chrome_channel_paths
        .iter()
        .find(|path| path.is_file())
    {
        debug!(path = %path.display(), "Using locally installed Chrome");
        return Ok(path.clone());
    }

    headless_chrome::browser::default_executable().map_err(DocumentError::BrowserLaunch)
}

/// Launch arguments for one render: the base set plus per-document extras.
pub fn launch_args<'a>(extra: &'a [&'a str]) -> Vec<&'a OsStr> {
    BASE_ARGS
        .iter()
        .chain(extra.iter())
        .map(|arg| OsStr::new(*arg))
        .collect()
}

/// Starts a headless browser. The process is killed when the returned
/// `Browser` is dropped.
pub fn launch(
    config: &BrowserConfig,
    executable: PathBuf,
    window_size: (u32, u32),
    extra_args: &[&str],
) -> Result<Browser> {
    info!(path = %executable.display(), "Launching browser");

    let options = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(config.sandbox)
        .path(Some(executable))
        .window_size(Some(window_size))
        .idle_browser_timeout(config.idle_timeout())
        .args(launch_args(extra_args))
        .build()
        .map_err(|e| DocumentError::BrowserLaunch(e.to_string()))?;

    let browser = Browser::new(options).map_err(|e| DocumentError::BrowserLaunch(format!("{e:#}")))?;

    info!("Browser launched successfully");
    Ok(browser)
}
