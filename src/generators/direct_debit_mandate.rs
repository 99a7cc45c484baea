// loan-document-service/src/generators/direct_debit_mandate.rs

use crate::error::Result;
use crate::generators::{Generator, TemplateRegistry, DIRECT_DEBIT_MANDATE_TEMPLATE};
use crate::models::DirectDebitMandate;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Mandate plus resolved artwork. `header_image` and `footer_image` are
/// placed inside CSS `url("...")` unescaped, so they must be data URLs we
/// produced or configured URLs; an empty string leaves the band blank.
#[derive(Debug, Clone, Serialize)]
pub struct MandatePage {
    pub mandate: DirectDebitMandate,
    pub logo: String,
    pub header_image: String,
    pub footer_image: String,
    pub signed_on: NaiveDate,
}

#[derive(Serialize)]
struct MandateContext<'a> {
    mandate: &'a DirectDebitMandate,
    logo: &'a str,
    header_image: &'a str,
    footer_image: &'a str,
    signed_date: String,
}

pub struct DirectDebitMandateGenerator {
    templates: Arc<TemplateRegistry>,
}

impl DirectDebitMandateGenerator {
    pub fn new(templates: Arc<TemplateRegistry>) -> Self {
        Self { templates }
    }
}

impl Generator for DirectDebitMandateGenerator {
    type Page = MandatePage;

    fn generate(&self, page: &MandatePage) -> Result<String> {
        info!(
            borrower = %page.mandate.borrower_name,
            business = %page.mandate.business_name,
            "Generating direct debit mandate"
        );

        let context = MandateContext {
            mandate: &page.mandate,
            logo: &page.logo,
            header_image: css_url_safe(&page.header_image),
            footer_image: css_url_safe(&page.footer_image),
            // e.g. "January 20, 2025"
            signed_date: page.signed_on.format("%B %-d, %Y").to_string(),
        };

        let html = self
            .templates
            .render(DIRECT_DEBIT_MANDATE_TEMPLATE, &context)?;

        info!(size_bytes = html.len(), "Direct debit mandate generated");
        Ok(html)
    }
}

fn css_url_safe(src: &str) -> &str {
    if src.contains(['"', '\\', '<', '>', '\n']) {
        ""
    } else {
        src
    }
}
