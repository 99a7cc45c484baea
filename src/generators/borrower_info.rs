// loan-document-service/src/generators/borrower_info.rs

use crate::error::Result;
use crate::generators::{Generator, TemplateRegistry, BORROWER_INFO_TEMPLATE};
use crate::models::BorrowerInfo;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Borrower record plus the photo sources resolved by the pipeline (data URLs
/// when inlining succeeded, remote URLs otherwise).
#[derive(Debug, Clone, Default, Serialize)]
pub struct BorrowerInfoPage {
    pub info: BorrowerInfo,
    pub borrower_image: Option<String>,
    pub guarantor_image: Option<String>,
}

#[derive(Serialize)]
struct Row<'a> {
    label: &'static str,
    value: &'a str,
}

#[derive(Serialize)]
struct MediaLink<'a> {
    label: &'static str,
    href: &'a str,
}

#[derive(Serialize)]
struct BorrowerInfoContext<'a> {
    borrower_rows: Vec<Row<'a>>,
    business_rows: Vec<Row<'a>>,
    guarantor_rows: Vec<Row<'a>>,
    media_links: Vec<MediaLink<'a>>,
    borrower_image: Option<&'a str>,
    guarantor_image: Option<&'a str>,
}

pub struct BorrowerInfoGenerator {
    templates: Arc<TemplateRegistry>,
}

impl BorrowerInfoGenerator {
    pub fn new(templates: Arc<TemplateRegistry>) -> Self {
        Self { templates }
    }

    fn context<'a>(page: &'a BorrowerInfoPage) -> BorrowerInfoContext<'a> {
        let info = &page.info;
        let row = |label, value: &'a String| Row {
            label,
            value: value.as_str(),
        };

        let media_links = [
            ("View Utility Bill", &info.utility_bill_url),
            ("Authority to Seize", &info.authority_to_seize_url),
            ("Shop Video", &info.shop_video_url),
        ]
        .into_iter()
        .filter(|(_, href)| !href.is_empty())
        .map(|(label, href)| MediaLink {
            label,
            href: href.as_str(),
        })
        .collect();

        BorrowerInfoContext {
            borrower_rows: vec![
                row("Region", &info.region),
                row("Branch", &info.branch),
                row("Loan Type", &info.loan_type),
                row("Obligor Name", &info.obligor_name),
                row("Phone Number", &info.obligor_phone_number),
                row("Home Address", &info.obligor_home_address),
                row("Nearest Bus Stop", &info.nearest_bus_stop),
                row("Landmark", &info.landmark),
                row("BVN/NIN Details", &info.bvn_details),
            ],
            business_rows: vec![
                row("Business Type", &info.obligor_business),
                row("Shop Address", &info.obligor_shop_address),
                row("In-Store Stock Value", &info.in_store_stock),
                row("KYC Validation", &info.kyc_validation),
                row("Business Ownership Validation", &info.business_ownership_validation),
                row("Loan Amount", &info.loan_amount),
                row("Tenor", &info.tenor),
                row("Daily Repayment", &info.daily_repayment),
            ],
            guarantor_rows: vec![
                row("Guarantor Name", &info.guarantor_name),
                row("Phone Number", &info.guarantor_phone_number),
                row("Occupation", &info.guarantor_occupation),
                row("Work Address", &info.guarantor_work_address),
                row("Home Address", &info.guarantor_home_address),
                row("Nearest Bus Stop", &info.guarantor_bus_stop),
                row("Landmark", &info.guarantor_landmark),
            ],
            media_links,
            borrower_image: page.borrower_image.as_deref().filter(|s| !s.is_empty()),
            guarantor_image: page.guarantor_image.as_deref().filter(|s| !s.is_empty()),
        }
    }
}

impl Generator for BorrowerInfoGenerator {
    type Page = BorrowerInfoPage;

    fn generate(&self, page: &BorrowerInfoPage) -> Result<String> {
        info!(obligor = %page.info.obligor_name, "Generating borrower info document");

        let html = self
            .templates
            .render(BORROWER_INFO_TEMPLATE, &Self::context(page))?;

        info!(size_bytes = html.len(), "Borrower info document generated");
        Ok(html)
    }
}
