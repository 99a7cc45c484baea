// loan-document-service/src/assets/inline.rs

use base64::{engine::general_purpose, Engine as _};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{debug, warn};

const FALLBACK_CONTENT_TYPE: &str = "image/png";

/// Downloads remote images and turns them into `data:` URLs so the browser
/// never has to reach the network while printing.
#[derive(Clone)]
pub struct ImageFetcher {
    client: reqwest::Client,
    timeout: Duration,
    max_bytes: usize,
}

impl ImageFetcher {
    pub fn new(timeout: Duration, max_bytes: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
            max_bytes,
        }
    }

    /// Returns `None` on an empty URL or any fetch failure. Failures are
    /// logged and never abort document generation.
    pub async fn fetch_data_url(&self, url: &str) -> Option<String> {
        if url.trim().is_empty() {
            return None;
        }

        let mut response = match self.client.get(url).timeout(self.timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "Error fetching image");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Image fetch failed");
            return None;
        }

        // A missing header is tolerated; anything that is not an image is not.
        let content_type = match response.headers().get(CONTENT_TYPE) {
            None => FALLBACK_CONTENT_TYPE.to_string(),
            Some(value) => match value.to_str().ok().filter(|v| is_image_media_type(v)) {
                Some(value) => value.to_string(),
                None => {
                    warn!(url = %url, content_type = ?value, "Refusing non-image content");
                    return None;
                }
            },
        };

        if let Some(length) = response.content_length() {
            if length > self.max_bytes as u64 {
                warn!(url = %url, size_bytes = length, max_bytes = self.max_bytes, "Image too large");
                return None;
            }
        }

        let mut bytes = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    if bytes.len() + chunk.len() > self.max_bytes {
                        warn!(url = %url, max_bytes = self.max_bytes, "Image too large");
                        return None;
                    }
                    bytes.extend_from_slice(&chunk);
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(url = %url, error = %e, "Error reading image body");
                    return None;
                }
            }
        }

        debug!(url = %url, content_type = %content_type, size_bytes = bytes.len(), "Inlined image");

        Some(format!(
            "data:{};base64,{}",
            content_type,
            general_purpose::STANDARD.encode(&bytes)
        ))
    }
}

/// Only `image/*` types are inlined. Data URLs end up inside CSS `url("...")`,
/// so the media type must not be able to close the string either.
fn is_image_media_type(value: &str) -> bool {
    value
        .split(';')
        .next()
        .map(|essence| essence.trim().to_ascii_lowercase())
        .map_or(false, |essence| essence.starts_with("image/") && essence.len() > "image/".len())
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '+' | '-' | '.' | ';' | '=' | ' '))
}
