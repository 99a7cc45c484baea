// loan-document-service/src/renderers/pdf.rs

use crate::config::BrowserConfig;
use crate::error::{DocumentError, Result};
use crate::renderers::browser;
use async_trait::async_trait;
use headless_chrome::types::PrintToPdfOptions;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use url::Url;

// A4 in inches, as Chrome's print pipeline expects.
const A4_WIDTH_IN: f64 = 8.27;
const A4_HEIGHT_IN: f64 = 11.7;
const CSS_PX_PER_INCH: f64 = 96.0;

/// Page setup and browser tuning for one kind of document.
#[derive(Debug, Clone, PartialEq)]
pub struct PageProfile {
    pub margin_top_px: f64,
    pub margin_bottom_px: f64,
    pub margin_side_px: f64,
    pub prefer_css_page_size: bool,
    pub window_size: (u32, u32),
    pub page_timeout: Duration,
    pub extra_args: &'static [&'static str],
}

impl PageProfile {
    /// A4 with 30px top and bottom margins.
    pub fn borrower_info() -> Self {
        Self {
            margin_top_px: 30.0,
            margin_bottom_px: 30.0,
            margin_side_px: 0.0,
            prefer_css_page_size: false,
            window_size: (1024, 768),
            page_timeout: Duration::from_secs(15),
            extra_args: &[],
        }
    }

    /// Full-bleed A4; the template's own bands provide the spacing.
    pub fn direct_debit_mandate() -> Self {
        Self {
            margin_top_px: 0.0,
            margin_bottom_px: 0.0,
            margin_side_px: 0.0,
            prefer_css_page_size: true,
            window_size: (1024, 768),
            page_timeout: Duration::from_secs(30),
            extra_args: &["--disable-features=VizDisplayCompositor"],
        }
    }

    pub fn print_options(&self) -> PrintToPdfOptions {
        PrintToPdfOptions {
            landscape: Some(false),
            display_header_footer: Some(false),
            print_background: Some(true),
            paper_width: Some(A4_WIDTH_IN),
            paper_height: Some(A4_HEIGHT_IN),
            margin_top: Some(self.margin_top_px / CSS_PX_PER_INCH),
            margin_bottom: Some(self.margin_bottom_px / CSS_PX_PER_INCH),
            margin_left: Some(self.margin_side_px / CSS_PX_PER_INCH),
            margin_right: Some(self.margin_side_px / CSS_PX_PER_INCH),
            prefer_css_page_size: Some(self.prefer_css_page_size),
            ..Default::default()
        }
    }
}

/// Converts a complete HTML document into PDF bytes.
#[async_trait]
pub trait PdfEngine: Send + Sync {
    async fn html_to_pdf(&self, html: &str, profile: &PageProfile) -> Result<Vec<u8>>;
}

/// Prints through a fresh headless Chrome per document. The number of
/// browsers alive at once is capped by `browser.max_concurrent`.
pub struct ChromePdfEngine {
    config: BrowserConfig,
    permits: Arc<Semaphore>,
}

impl ChromePdfEngine {
    pub fn new(config: BrowserConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent.max(1)));
        Self { config, permits }
    }
}

#[async_trait]
impl PdfEngine for ChromePdfEngine {
    async fn html_to_pdf(&self, html: &str, profile: &PageProfile) -> Result<Vec<u8>> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| DocumentError::BrowserLaunch(e.to_string()))?;

        // The page is loaded from disk so large inlined images never travel
        // through the DevTools protocol as one message.
        let mut html_file = tempfile::Builder::new()
            .prefix("loan-document-")
            .suffix(".html")
            .tempfile()?;
        html_file.write_all(html.as_bytes())?;
        html_file.flush()?;

        debug!(path = ?html_file.path(), "HTML written to temp file");

        let config = self.config.clone();
        let profile = profile.clone();

        // The permit travels with the blocking task: if the caller goes away
        // the browser keeps running, and so must its slot.
        let pdf = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            print_file(&config, &profile, html_file)
        })
        .await??;

        info!(size_kb = pdf.len() / 1024, "PDF generated successfully");
        Ok(pdf)
    }
}

fn print_file(
    config: &BrowserConfig,
    profile: &PageProfile,
    html_file: tempfile::NamedTempFile,
) -> Result<Vec<u8>> {
    let file_url = Url::from_file_path(html_file.path())
        .map_err(|_| DocumentError::PdfExport("Failed to convert file path to URL".to_string()))?;

    let executable = browser::resolve_executable(config)?;
    let browser = browser::launch(config, executable, profile.window_size, profile.extra_args)?;

    let result = (|| -> anyhow::Result<Vec<u8>> {
        let tab = browser.new_tab()?;
        tab.set_default_timeout(profile.page_timeout);

        debug!(url = %file_url, "Loading document");
        tab.navigate_to(file_url.as_str())?;
        tab.wait_until_navigated()?;

        debug!("Content loaded, printing PDF");
        tab.print_to_pdf(Some(profile.print_options()))
    })();

    // Dropping the handle kills the chromium process on success and failure alike.
    drop(browser);
    debug!("Browser closed");

    result.map_err(|e| {
        warn!(error = %format!("{e:#}"), "PDF export failed");
        DocumentError::PdfExport(format!("{e:#}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borrower_profile_uses_thirty_pixel_margins() {
        let options = PageProfile::borrower_info().print_options();

        assert_eq!(options.margin_top, Some(30.0 / 96.0));
        assert_eq!(options.margin_bottom, Some(30.0 / 96.0));
        assert_eq!(options.margin_left, Some(0.0));
        assert_eq!(options.print_background, Some(true));
        assert_eq!(options.paper_width, Some(A4_WIDTH_IN));
        assert_eq!(options.prefer_css_page_size, Some(false));
    }

    #[test]
    fn mandate_profile_is_full_bleed() {
        let profile = PageProfile::direct_debit_mandate();
        let options = profile.print_options();

        assert_eq!(options.margin_top, Some(0.0));
        assert_eq!(options.margin_right, Some(0.0));
        assert_eq!(options.display_header_footer, Some(false));
        assert_eq!(options.prefer_css_page_size, Some(true));
        assert_eq!(profile.page_timeout, Duration::from_secs(30));
        assert!(profile.extra_args.contains(&"--disable-features=VizDisplayCompositor"));
    }

    #[tokio::test]
    async fn missing_browser_binary_is_a_launch_error() {
        let mut config = crate::config::test_config().browser;
        config.executable_path = Some("/nonexistent/chromium-binary".into());
        let engine = ChromePdfEngine::new(config);

        let err = engine
            .html_to_pdf("<html></html>", &PageProfile::borrower_info())
            .await
            .unwrap_err();

        assert!(matches!(err, DocumentError::BrowserLaunch(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn cancelled_request_keeps_browser_slot_until_browser_exits() {
        use std::os::unix::fs::PermissionsExt;

        // Stands in for chromium: never prints a DevTools URL, exits after a while.
        let dir = tempfile::tempdir().unwrap();
        let fake_browser = dir.path().join("slow-chromium");
        std::fs::write(&fake_browser, "#!/bin/sh\nsleep 2\n").unwrap();
        std::fs::set_permissions(&fake_browser, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut config = crate::config::test_config().browser;
        config.executable_path = Some(fake_browser);
        config.max_concurrent = 1;
        let engine = Arc::new(ChromePdfEngine::new(config));

        let render = {
            let engine = engine.clone();
            tokio::spawn(async move {
                engine
                    .html_to_pdf("<html></html>", &PageProfile::borrower_info())
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(engine.permits.available_permits(), 0);

        render.abort();
        let _ = render.await;
        assert_eq!(engine.permits.available_permits(), 0);

        let deadline = tokio::time::Instant::now() + Duration::from_secs(60);
        while engine.permits.available_permits() == 0 {
            assert!(
                tokio::time::Instant::now() < deadline,
                "browser slot was never released"
            );
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(engine.permits.available_permits(), 1);
    }
}
