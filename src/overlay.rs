//! Header/footer overlay: stamps the logo band and the footer line into the
//! reserved margins of every page once the final page count is known.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use serde::Deserialize;

use crate::error::{Error, ExportError, Result};
use crate::fonts::{ASCENDER_RATIO, Font};
use crate::paginate::{Page, PageSpec, mm_to_pts};

/// Placement of the header logo and footer line, in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayStyle {
    /// Logo width as a fraction of the page width.
    pub logo_width_ratio: f32,
    pub logo_top: f32,
    pub logo_height: f32,
    /// Footer font size in points.
    pub footer_font_size: f32,
    pub footer_left: f32,
    /// Footer baseline distance from the bottom edge.
    pub footer_bottom: f32,
    /// Distance from the page's right edge to the right edge of "Page i of N".
    pub page_label_right: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            logo_width_ratio: 0.8,
            logo_top: 10.0,
            logo_height: 20.0,
            footer_font_size: 10.0,
            footer_left: 10.0,
            footer_bottom: 10.0,
            page_label_right: 50.0,
        }
    }
}

/// Logo placement in points, measured from the page's top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderStamp {
    pub x: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Footer text placement in points; `baseline` is measured from the bottom edge.
#[derive(Clone, Debug, PartialEq)]
pub struct FooterStamp {
    pub text: String,
    pub text_x: f32,
    pub page_label: String,
    pub page_label_x: f32,
    pub baseline: f32,
    pub font_size: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    pub header: HeaderStamp,
    pub footer: FooterStamp,
}

impl Overlay {
    /// True when both stamps lie inside the reserved margin bands of `spec`.
    pub fn fits_margins(&self, spec: &PageSpec) -> bool {
        let top_band = mm_to_pts(spec.margin_top);
        let bottom_band = mm_to_pts(spec.margin_bottom);
        let page_w = spec.page_width_pts();

        let header_ok = self.header.top >= 0.0
            && self.header.top + self.header.height <= top_band
            && self.header.x >= 0.0
            && self.header.x + self.header.width <= page_w;

        let ascent = self.footer.font_size * ASCENDER_RATIO;
        let descent = self.footer.font_size * (1.0 - ASCENDER_RATIO);
        let footer_ok = self.footer.baseline - descent >= 0.0
            && self.footer.baseline + ascent <= bottom_band
            && self.footer.text_x >= 0.0
            && self.footer.page_label_x >= 0.0;

        header_ok && footer_ok
    }
}

pub fn page_label(page: usize, total: usize) -> String {
    format!("Page {page} of {total}")
}

/// The static logo plus the company footer line. Cheap to clone.
#[derive(Clone, Debug)]
pub struct BrandAssets {
    logo: Arc<[u8]>,
    company_footer: String,
}

static LOGO_CACHE: OnceLock<Mutex<HashMap<PathBuf, Arc<[u8]>>>> = OnceLock::new();

impl BrandAssets {
    pub fn new(logo: impl Into<Arc<[u8]>>, company_footer: impl Into<String>) -> Self {
        Self {
            logo: logo.into(),
            company_footer: company_footer.into(),
        }
    }

    /// Load a logo through the process-wide cache: each path is read from disk
    /// once and shared by every later export run.
    pub fn shared(path: &Path, company_footer: impl Into<String>) -> Result<Self> {
        let cache = LOGO_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
        let mut cache = cache
            .lock()
            .map_err(|_| ExportError::AssetUnavailable("logo cache poisoned".into()))?;

        let logo = match cache.get(path) {
            Some(bytes) => Arc::clone(bytes),
            None => {
                let bytes: Arc<[u8]> = std::fs::read(path)
                    .map_err(|e| {
                        ExportError::AssetUnavailable(format!("{}: {e}", path.display()))
                    })?
                    .into();
                log::debug!("Loaded logo {} ({} bytes)", path.display(), bytes.len());
                cache.insert(path.to_path_buf(), Arc::clone(&bytes));
                bytes
            }
        };

        Ok(Self::new(logo, company_footer))
    }

    pub fn logo(&self) -> &[u8] {
        &self.logo
    }

    pub fn company_footer(&self) -> &str {
        &self.company_footer
    }
}

/// Stamp the header logo and the footer line onto every page.
///
/// Must run after pagination has finished so that N is final. Body blocks
/// are not touched. A sequence where any page already carries an overlay is
/// rejected as a whole, leaving every page unchanged.
pub fn decorate(
    pages: &mut [Page],
    spec: &PageSpec,
    brand: &BrandAssets,
    style: &OverlayStyle,
) -> Result<()> {
    if let Some(page) = pages.iter().find(|p| p.is_decorated()) {
        return Err(Error::AlreadyDecorated { page: page.number });
    }

    let total = pages.len();
    let page_w = spec.page_width_pts();
    let logo_w = page_w * style.logo_width_ratio;
    let header = HeaderStamp {
        x: (page_w - logo_w) / 2.0,
        top: mm_to_pts(style.logo_top),
        width: logo_w,
        height: mm_to_pts(style.logo_height),
    };

    let mut overlays = Vec::with_capacity(total);
    for idx in 0..total {
        let label = page_label(idx + 1, total);
        let label_w = Font::Regular.text_width(&label, style.footer_font_size);
        let overlay = Overlay {
            header: header.clone(),
            footer: FooterStamp {
                text: brand.company_footer().to_string(),
                text_x: mm_to_pts(style.footer_left),
                page_label_x: page_w - mm_to_pts(style.page_label_right) - label_w,
                page_label: label,
                baseline: mm_to_pts(style.footer_bottom),
                font_size: style.footer_font_size,
            },
        };
        if !overlay.fits_margins(spec) {
            return Err(Error::InvalidConfig(format!(
                "header/footer stamps for page {} fall outside the reserved margins",
                idx + 1
            )));
        }
        overlays.push(overlay);
    }

    for (page, overlay) in pages.iter_mut().zip(overlays) {
        page.overlay = Some(overlay);
    }
    log::debug!("Decorated {total} pages");
    Ok(())
}
