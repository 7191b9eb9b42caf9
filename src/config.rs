use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::overlay::OverlayStyle;
use crate::paginate::PageSpec;

pub const DEFAULT_FILENAME: &str = "quotation.pdf";
pub const DEFAULT_COMPANY_FOOTER: &str = "Mead Interior Design LLC";

/// Environment variable naming the logo file when no `--logo` flag is given.
pub const LOGO_ENV: &str = "QUOTATION_LOGO";

/// Everything an export run can be tuned with. Missing keys in a config file
/// keep their defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    /// Suggested name for the produced file; callers may ignore it.
    pub filename: String,
    pub page: PageSpec,
    pub overlay: OverlayStyle,
    /// Logo rasterization factor relative to 96 dpi display size.
    pub raster_scale: f32,
    pub jpeg_quality: u8,
    pub company_footer: String,
    pub letter: LetterConfig,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            filename: DEFAULT_FILENAME.to_string(),
            page: PageSpec::a4_portrait(),
            overlay: OverlayStyle::default(),
            raster_scale: 4.0,
            jpeg_quality: 98,
            company_footer: DEFAULT_COMPANY_FOOTER.to_string(),
            letter: LetterConfig::default(),
        }
    }
}

impl ExportOptions {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
        })?;
        let options: Self = serde_json::from_str(&text)
            .map_err(|e| Error::InvalidConfig(format!("{}: {e}", path.display())))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.raster_scale > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "rasterScale must be positive, got {}",
                self.raster_scale
            )));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(Error::InvalidConfig(format!(
                "jpegQuality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        self.page.validate()
    }
}

/// Fixed wording of the quotation letter.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LetterConfig {
    pub title: String,
    pub product_line: String,
    pub exclusions: String,
    pub contract_terms: String,
    pub payment_terms: String,
    pub delivery_terms: String,
    pub validity: String,
    pub closing: String,
    pub signatory: String,
    pub company: String,
    pub email: String,
    pub mobile: String,
    pub approvals: [String; 3],
}

impl Default for LetterConfig {
    fn default() -> Self {
        Self {
            title: "QUOTATION FOR CHAIRS OFFICE AT".into(),
            product_line: "Chairs".into(),
            exclusions: "Any scope of works which are not mentioned above.".into(),
            contract_terms: "The final quantity of items & total value is subject to change as \
                             per the approved drawings and documents."
                .into(),
            payment_terms: "Payments are due 30 days from the date of invoice.".into(),
            delivery_terms: "Delivery will be made within 4-6 weeks from the date of confirmed order."
                .into(),
            validity: "Quotation is valid for 30 days from the date of issue.".into(),
            closing: "We believe the above quotation covers all important aspects concerning the \
                      products and services to be supplied and we thank you for giving us an \
                      opportunity to submit this quotation. We will be pleased to answer any query \
                      you may have with regard to the above or any other related matter, subject to \
                      which we look forward to receiving your valuable order confirmation within \
                      the validity period stated in the quotation."
                .into(),
            signatory: "Max Ebenezer Thomas".into(),
            company: "MEAD Interior Design LLC".into(),
            email: "Architect@meadinteriors.com".into(),
            mobile: "0555577359".into(),
            approvals: [
                "Prepared by: Estimator".into(),
                "Verified by: Design Manager".into(),
                "Approved by: General Manager".into(),
            ],
        }
    }
}
