// loan-document-service/src/pipeline.rs

use chrono::Local;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

use crate::assets::{direct_download_url, ImageFetcher};
use crate::config::{AssetConfig, Config};
use crate::error::Result;
use crate::generators::{
    BorrowerInfoGenerator, BorrowerInfoPage, DirectDebitMandateGenerator, Generator, MandatePage,
    TemplateRegistry,
};
use crate::models::{BorrowerInfo, DirectDebitMandate, Disposition, RenderedDocument};
use crate::renderers::{PageProfile, PdfEngine};

const BORROWER_INFO_FILE_NAME: &str = "customer-info.pdf";
const PDF_CONTENT_TYPE: &str = "application/pdf";

/// How the mandate's background artwork reaches the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetMode {
    /// Fetched by the service and embedded as data URLs.
    Inline,
    /// Referenced by URL and left for the browser to load.
    Remote,
}

/// Orchestrates: resolve assets → generate HTML → print PDF → checksum.
pub struct DocumentPipeline {
    borrower_info: BorrowerInfoGenerator,
    mandate: DirectDebitMandateGenerator,
    engine: Arc<dyn PdfEngine>,
    images: ImageFetcher,
    assets: AssetConfig,
}

impl DocumentPipeline {
    pub fn new(config: &Config, engine: Arc<dyn PdfEngine>) -> Result<Self> {
        let templates = Arc::new(TemplateRegistry::new(config.templates.path.as_deref())?);

        Ok(Self {
            borrower_info: BorrowerInfoGenerator::new(templates.clone()),
            mandate: DirectDebitMandateGenerator::new(templates),
            engine,
            images: ImageFetcher::new(
                config.assets.image_fetch_timeout(),
                config.assets.max_image_bytes,
            ),
            assets: config.assets.clone(),
        })
    }

    #[instrument(skip(self, info), fields(obligor = %info.obligor_name))]
    pub async fn borrower_info_pdf(&self, info: BorrowerInfo) -> Result<RenderedDocument> {
        let start = Instant::now();

        let (borrower_image, guarantor_image) = futures::join!(
            self.resolve_photo(&info.borrower_image_url),
            self.resolve_photo(&info.guarantor_image_url),
        );

        let html = self.borrower_info.generate(&BorrowerInfoPage {
            info,
            borrower_image,
            guarantor_image,
        })?;

        let data = self
            .engine
            .html_to_pdf(&html, &PageProfile::borrower_info())
            .await?;

        Ok(finish(
            data,
            BORROWER_INFO_FILE_NAME.to_string(),
            Disposition::Inline,
            start,
        ))
    }

    /// Renders the mandate page without printing it.
    #[instrument(skip(self, mandate), fields(borrower = %mandate.borrower_name))]
    pub async fn mandate_html(&self, mandate: DirectDebitMandate, mode: AssetMode) -> Result<String> {
        let mode = if self.assets.inline_images {
            mode
        } else {
            AssetMode::Remote
        };

        let (header_image, footer_image) = match mode {
            AssetMode::Inline => {
                let (header, footer) = futures::join!(
                    self.images.fetch_data_url(&self.assets.header_image_url),
                    self.images.fetch_data_url(&self.assets.footer_image_url),
                );
                (header.unwrap_or_default(), footer.unwrap_or_default())
            }
            AssetMode::Remote => (
                self.assets.header_image_url.clone(),
                self.assets.footer_image_url.clone(),
            ),
        };

        self.mandate.generate(&MandatePage {
            mandate,
            logo: self.assets.logo_url.clone(),
            header_image,
            footer_image,
            signed_on: Local::now().date_naive(),
        })
    }

    #[instrument(skip(self, mandate), fields(borrower = %mandate.borrower_name))]
    pub async fn mandate_pdf(
        &self,
        mandate: DirectDebitMandate,
        mode: AssetMode,
    ) -> Result<RenderedDocument> {
        let start = Instant::now();
        mandate.validate()?;

        let file_name = mandate.file_name();
        let html = self.mandate_html(mandate, mode).await?;

        info!("HTML template generated, printing PDF");
        let data = self
            .engine
            .html_to_pdf(&html, &PageProfile::direct_debit_mandate())
            .await?;

        Ok(finish(data, file_name, Disposition::Attachment, start))
    }

    /// Drive links are made directly downloadable, then inlined. When the
    /// download fails the browser is left to try the URL itself.
    async fn resolve_photo(&self, url: &str) -> Option<String> {
        if url.trim().is_empty() {
            return None;
        }

        let direct = direct_download_url(url);
        if !self.assets.inline_images {
            return Some(direct);
        }

        match self.images.fetch_data_url(&direct).await {
            Some(data_url) => Some(data_url),
            None => Some(direct),
        }
    }
}

fn finish(
    data: Vec<u8>,
    file_name: String,
    disposition: Disposition,
    start: Instant,
) -> RenderedDocument {
    let mut hasher = Sha256::new();
    hasher.update(&data);
    let sha256_checksum = hex::encode(hasher.finalize());
    let rendering_duration_ms = start.elapsed().as_millis() as u64;

    info!(
        file_name = %file_name,
        size_bytes = data.len(),
        sha256 = %sha256_checksum,
        rendering_duration_ms,
        "Document rendered"
    );

    RenderedDocument {
        data,
        content_type: PDF_CONTENT_TYPE.to_string(),
        file_name,
        disposition,
        sha256_checksum,
        rendering_duration_ms,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::DocumentError;
    use async_trait::async_trait;
    use axum::http::header;
    use axum::Router;
    use std::sync::Mutex;
    use tokio::net::TcpListener;

    pub(crate) const STUB_PDF: &[u8] = b"%PDF-1.7\n%stub\n";

    /// Records the HTML it was asked to print and returns a fixed PDF.
    #[derive(Default)]
    pub(crate) struct StubEngine {
        pub printed: Mutex<Vec<(String, PageProfile)>>,
        pub fail: bool,
    }

    #[async_trait]
    impl PdfEngine for StubEngine {
        async fn html_to_pdf(&self, html: &str, profile: &PageProfile) -> Result<Vec<u8>> {
            if self.fail {
                return Err(DocumentError::BrowserLaunch("chromium not installed".to_string()));
            }
            self.printed
                .lock()
                .unwrap()
                .push((html.to_string(), profile.clone()));
            Ok(STUB_PDF.to_vec())
        }
    }

    fn pipeline(engine: Arc<StubEngine>) -> DocumentPipeline {
        DocumentPipeline::new(&crate::config::test_config(), engine).unwrap()
    }

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    /// Serves `PNG` at any path.
    async fn serve_artwork() -> String {
        let app = Router::new().fallback(|| async { ([(header::CONTENT_TYPE, "image/png")], PNG) });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn borrower_info_is_printed_inline_with_checksum() {
        let engine = Arc::new(StubEngine::default());
        let info = BorrowerInfo {
            obligor_name: "Amaka Nwosu".to_string(),
            ..Default::default()
        };

        let doc = pipeline(engine.clone()).borrower_info_pdf(info).await.unwrap();

        assert_eq!(doc.data, STUB_PDF);
        assert_eq!(doc.content_disposition(), "inline; filename=customer-info.pdf");
        assert_eq!(doc.sha256_checksum.len(), 64);

        let printed = engine.printed.lock().unwrap();
        assert_eq!(printed.len(), 1);
        assert!(printed[0].0.contains("Amaka Nwosu"));
        assert_eq!(printed[0].1, PageProfile::borrower_info());
    }

    #[tokio::test]
    async fn borrower_photos_are_embedded_as_data_urls() {
        let base = serve_artwork().await;
        let engine = Arc::new(StubEngine::default());
        let info = BorrowerInfo {
            obligor_name: "Amaka Nwosu".to_string(),
            borrower_image_url: format!("{}/borrower.png", base),
            guarantor_image_url: format!("{}/guarantor.png", base),
            ..Default::default()
        };

        pipeline(engine.clone()).borrower_info_pdf(info).await.unwrap();

        let printed = engine.printed.lock().unwrap();
        let html = &printed[0].0;
        assert_eq!(html.matches(r#"<img src="data:image/png;base64,"#).count(), 2);
        assert!(!html.contains(&base));
    }

    #[tokio::test]
    async fn mandate_artwork_is_embedded_in_css() {
        let base = serve_artwork().await;
        let mut config = crate::config::test_config();
        config.assets.header_image_url = format!("{}/header.png", base);
        config.assets.footer_image_url = format!("{}/footer.png", base);
        let engine = Arc::new(StubEngine::default());
        let pipeline = DocumentPipeline::new(&config, engine.clone()).unwrap();

        pipeline
            .mandate_pdf(DirectDebitMandate::example(), AssetMode::Inline)
            .await
            .unwrap();

        let printed = engine.printed.lock().unwrap();
        let html = &printed[0].0;
        assert_eq!(html.matches(r#"background-image: url("data:image/png;base64,"#).count(), 2);
        assert!(!html.contains(&base));
    }

    #[tokio::test]
    async fn unreachable_photo_falls_back_to_direct_url() {
        let pipeline = pipeline(Arc::new(StubEngine::default()));

        let photo = pipeline
            .resolve_photo("http://127.0.0.1:1/file/d/abc/view")
            .await;
        assert_eq!(photo.as_deref(), Some("http://127.0.0.1:1/file/d/abc/view"));

        assert!(pipeline.resolve_photo("  ").await.is_none());
    }

    #[tokio::test]
    async fn mandate_rejects_missing_names_before_printing() {
        let engine = Arc::new(StubEngine::default());
        let mandate = DirectDebitMandate {
            borrower_name: "Tunde".to_string(),
            ..Default::default()
        };

        let err = pipeline(engine.clone())
            .mandate_pdf(mandate, AssetMode::Inline)
            .await
            .unwrap_err();

        assert!(matches!(err, DocumentError::MissingField(_)));
        assert!(engine.printed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn mandate_is_an_attachment_named_after_borrower() {
        let engine = Arc::new(StubEngine::default());
        let mandate = DirectDebitMandate {
            borrower_name: "Tunde Bakare".to_string(),
            business_name: "Seeds and Pennies".to_string(),
            ..Default::default()
        };

        let doc = pipeline(engine.clone())
            .mandate_pdf(mandate, AssetMode::Inline)
            .await
            .unwrap();

        assert_eq!(
            doc.content_disposition(),
            "attachment; filename=Tunde_Bakare-direct-debit-mandate.pdf"
        );
        let printed = engine.printed.lock().unwrap();
        assert_eq!(printed[0].1, PageProfile::direct_debit_mandate());
        assert!(printed[0].0.contains(r#"background-image: url("");"#));
    }

    #[tokio::test]
    async fn remote_mode_references_configured_artwork() {
        let mut config = crate::config::test_config();
        config.assets.header_image_url = "https://assets.example.test/header.png".to_string();
        let pipeline = DocumentPipeline::new(&config, Arc::new(StubEngine::default())).unwrap();

        let html = pipeline
            .mandate_html(DirectDebitMandate::example(), AssetMode::Remote)
            .await
            .unwrap();

        assert!(html.contains(r#"url("https://assets.example.test/header.png")"#));
    }
}
