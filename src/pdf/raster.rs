use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{GenericImageView, RgbImage};

use crate::error::ExportError;

/// Resolution the display size is expressed against before `raster_scale`.
const DISPLAY_DPI: f32 = 96.0;

pub(super) struct LogoRaster {
    pub(super) jpeg: Vec<u8>,
    pub(super) width: u32,
    pub(super) height: u32,
}

/// Decode the logo and re-encode it as a JPEG sized for print: `scale` × the
/// 96-dpi pixel size of the display box. Sources are only ever downsampled;
/// transparency is flattened onto white.
pub(super) fn rasterize_logo(
    data: &[u8],
    display_w_pts: f32,
    display_h_pts: f32,
    scale: f32,
    quality: u8,
) -> Result<LogoRaster, ExportError> {
    let decoded = image::load_from_memory(data)
        .map_err(|e| ExportError::AssetUnavailable(format!("logo could not be decoded: {e}")))?;

    let target_w = ((display_w_pts / 72.0 * DISPLAY_DPI * scale).round() as u32).max(1);
    let target_h = ((display_h_pts / 72.0 * DISPLAY_DPI * scale).round() as u32).max(1);
    let (src_w, src_h) = decoded.dimensions();
    let (w, h) = (src_w.min(target_w), src_h.min(target_h));

    let resized = if (w, h) != (src_w, src_h) {
        decoded.resize_exact(w, h, FilterType::Lanczos3)
    } else {
        decoded
    };

    let rgba = resized.to_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());
    for (dst, src) in rgb.pixels_mut().zip(rgba.pixels()) {
        let a = src.0[3] as u32;
        for c in 0..3 {
            dst.0[c] = ((src.0[c] as u32 * a + 255 * (255 - a)) / 255) as u8;
        }
    }

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality)
        .encode_image(&rgb)
        .map_err(|e| ExportError::Serialization(format!("logo JPEG encoding failed: {e}")))?;

    log::debug!(
        "Logo rasterized: {src_w}x{src_h} → {}x{} px, {} bytes at quality {quality}",
        rgb.width(),
        rgb.height(),
        jpeg.len()
    );

    Ok(LogoRaster {
        jpeg,
        width: rgb.width(),
        height: rgb.height(),
    })
}
