// loan-document-service/src/models.rs

use crate::error::{DocumentError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Accepts any JSON scalar and keeps its text form. `null`, `false`, `0` and
/// the empty string all collapse to an empty value, matching how the intake
/// forms submit "not provided".
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null | serde_json::Value::Bool(false) => String::new(),
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) if n.as_f64() == Some(0.0) => String::new(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(true) => "true".to_string(),
        other => other.to_string(),
    })
}

/// KYC record submitted for a loan applicant and their guarantor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BorrowerInfo {
    #[serde(deserialize_with = "lenient_string")]
    pub region: String,
    #[serde(deserialize_with = "lenient_string")]
    pub branch: String,
    #[serde(deserialize_with = "lenient_string")]
    pub loan_type: String,
    #[serde(deserialize_with = "lenient_string")]
    pub obligor_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub obligor_phone_number: String,
    #[serde(deserialize_with = "lenient_string")]
    pub obligor_home_address: String,
    #[serde(deserialize_with = "lenient_string")]
    pub nearest_bus_stop: String,
    #[serde(deserialize_with = "lenient_string")]
    pub landmark: String,
    #[serde(deserialize_with = "lenient_string")]
    pub bvn_details: String,

    #[serde(deserialize_with = "lenient_string")]
    pub obligor_business: String,
    #[serde(deserialize_with = "lenient_string")]
    pub obligor_shop_address: String,
    #[serde(deserialize_with = "lenient_string")]
    pub in_store_stock: String,
    #[serde(deserialize_with = "lenient_string")]
    pub kyc_validation: String,
    #[serde(deserialize_with = "lenient_string")]
    pub business_ownership_validation: String,
    #[serde(deserialize_with = "lenient_string")]
    pub loan_amount: String,
    #[serde(deserialize_with = "lenient_string")]
    pub tenor: String,
    #[serde(deserialize_with = "lenient_string")]
    pub daily_repayment: String,

    #[serde(deserialize_with = "lenient_string")]
    pub guarantor_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub guarantor_phone_number: String,
    #[serde(deserialize_with = "lenient_string")]
    pub guarantor_occupation: String,
    #[serde(deserialize_with = "lenient_string")]
    pub guarantor_work_address: String,
    #[serde(deserialize_with = "lenient_string")]
    pub guarantor_home_address: String,
    #[serde(deserialize_with = "lenient_string")]
    pub guarantor_bus_stop: String,
    #[serde(deserialize_with = "lenient_string")]
    pub guarantor_landmark: String,

    #[serde(deserialize_with = "lenient_string")]
    pub borrower_image_url: String,
    #[serde(deserialize_with = "lenient_string")]
    pub guarantor_image_url: String,
    #[serde(deserialize_with = "lenient_string")]
    pub utility_bill_url: String,
    #[serde(deserialize_with = "lenient_string")]
    pub authority_to_seize_url: String,
    #[serde(deserialize_with = "lenient_string")]
    pub shop_video_url: String,
}

/// Direct-debit mandate authorising repayments from the payer's account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectDebitMandate {
    #[serde(deserialize_with = "lenient_string")]
    pub borrower_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub business_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub business_phone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub business_email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub business_bank: String,
    #[serde(deserialize_with = "lenient_string")]
    pub business_account_number: String,
    #[serde(deserialize_with = "lenient_string")]
    pub payment_description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub amount: String,
    #[serde(deserialize_with = "lenient_string")]
    pub recursivity: String,
    #[serde(deserialize_with = "lenient_string")]
    pub scheduled_reduction: String,
    #[serde(deserialize_with = "lenient_string")]
    pub start_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub end_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub check_balance: String,
    #[serde(deserialize_with = "lenient_string")]
    pub payer_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub payer_phone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub payer_bank: String,
    #[serde(deserialize_with = "lenient_string")]
    pub payer_email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub payer_account_number: String,
}

impl DirectDebitMandate {
    /// Example mandate shown by the preview endpoint.
    pub fn example() -> Self {
        Self {
            borrower_name: "John Doe".to_string(),
            business_name: "Seeds and Pennies Limited".to_string(),
            business_phone: "+234 123 456 7890".to_string(),
            business_email: "business@seeds.com".to_string(),
            business_bank: "First Bank".to_string(),
            business_account_number: "1234567890".to_string(),
            payment_description: "Daily loan repayment for business loan".to_string(),
            amount: "₦50,000.00".to_string(),
            recursivity: "Daily".to_string(),
            scheduled_reduction: "None".to_string(),
            start_date: "2025-01-20".to_string(),
            end_date: "2025-12-20".to_string(),
            check_balance: "Yes".to_string(),
            payer_name: "John Doe".to_string(),
            payer_phone: "+234 987 654 3210".to_string(),
            payer_bank: "GTBank".to_string(),
            payer_email: "john@example.com".to_string(),
            payer_account_number: "0987654321".to_string(),
        }
    }

    /// Example mandate with any non-empty query parameter taking precedence.
    pub fn example_with_overrides(params: &HashMap<String, String>) -> Self {
        let mut mandate = Self::example();
        {
            let fields: [(&str, &mut String); 18] = [
                ("borrower_name", &mut mandate.borrower_name),
                ("business_name", &mut mandate.business_name),
                ("business_phone", &mut mandate.business_phone),
                ("business_email", &mut mandate.business_email),
                ("business_bank", &mut mandate.business_bank),
                ("business_account_number", &mut mandate.business_account_number),
                ("payment_description", &mut mandate.payment_description),
                ("amount", &mut mandate.amount),
                ("recursivity", &mut mandate.recursivity),
                ("scheduled_reduction", &mut mandate.scheduled_reduction),
                ("start_date", &mut mandate.start_date),
                ("end_date", &mut mandate.end_date),
                ("check_balance", &mut mandate.check_balance),
                ("payer_name", &mut mandate.payer_name),
                ("payer_phone", &mut mandate.payer_phone),
                ("payer_bank", &mut mandate.payer_bank),
                ("payer_email", &mut mandate.payer_email),
                ("payer_account_number", &mut mandate.payer_account_number),
            ];
            for (key, slot) in fields {
                if let Some(value) = params.get(key).filter(|v| !v.is_empty()) {
                    *slot = value.clone();
                }
            }
        }
        mandate
    }

    pub fn validate(&self) -> Result<()> {
        if self.borrower_name.is_empty() || self.business_name.is_empty() {
            return Err(DocumentError::MissingField(
                "borrower_name and business_name".to_string(),
            ));
        }
        Ok(())
    }

    /// `<borrower>-direct-debit-mandate.pdf` with every character outside
    /// `[A-Za-z0-9]` replaced by `_`.
    pub fn file_name(&self) -> String {
        let sanitized: String = self
            .borrower_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("{}-direct-debit-mandate.pdf", sanitized)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Inline,
    Attachment,
}

/// A finished PDF ready to be streamed back to the caller.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub data: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
    pub disposition: Disposition,
    pub sha256_checksum: String,
    pub rendering_duration_ms: u64,
}

impl RenderedDocument {
    pub fn content_disposition(&self) -> String {
        let kind = match self.disposition {
            Disposition::Inline => "inline",
            Disposition::Attachment => "attachment",
        };
        format!("{}; filename={}", kind, self.file_name)
    }
}
