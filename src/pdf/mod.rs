//! Exporter: serializes decorated pages into a single PDF byte stream.

mod draw;
mod raster;

use std::path::{Path, PathBuf};

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, TextStr};

use crate::config::ExportOptions;
use crate::error::{Error, ExportError, Result};
use crate::fonts::register_fonts;
use crate::layout::layout_block;
use crate::overlay::BrandAssets;
use crate::paginate::{Page, mm_to_pts};

use draw::{draw_block, draw_overlay};
use raster::rasterize_logo;

const LOGO_NAME: &str = "Im1";

/// A finished document. `filename` is a suggestion; callers may store the
/// bytes under any name.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Serialize decorated pages into one PDF, pages in order.
///
/// Every page must already carry its overlay. Nothing is returned unless the
/// whole document was produced.
pub fn serialize(
    pages: &[Page],
    brand: &BrandAssets,
    options: &ExportOptions,
    title: &str,
) -> Result<ExportedFile> {
    let t0 = std::time::Instant::now();
    let spec = &options.page;

    if pages.is_empty() {
        return Err(ExportError::Serialization("document has no pages".into()).into());
    }
    if let Some(page) = pages.iter().find(|p| !p.is_decorated()) {
        return Err(ExportError::Serialization(format!(
            "page {} has no header/footer overlay",
            page.number
        ))
        .into());
    }

    let page_w = spec.page_width_pts();
    let page_h = spec.page_height_pts();
    let left = mm_to_pts(spec.margin_left);
    let content_top = page_h - mm_to_pts(spec.margin_top);
    let content_w = spec.content_width_pts();

    // All pages share the same header geometry; rasterize the logo once for it.
    let header = &pages[0]
        .overlay()
        .ok_or_else(|| ExportError::Serialization("page 1 has no overlay".into()))?
        .header;
    let logo = rasterize_logo(
        brand.logo(),
        header.width,
        header.height,
        options.raster_scale,
        options.jpeg_quality,
    )?;
    let t_logo = t0.elapsed();

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();
    let fonts = register_fonts(&mut pdf, &mut alloc);

    let logo_ref = alloc();
    {
        let mut xobj = pdf.image_xobject(logo_ref, &logo.jpeg);
        xobj.filter(Filter::DctDecode);
        xobj.width(logo.width as i32);
        xobj.height(logo.height as i32);
        xobj.color_space().device_rgb();
        xobj.bits_per_component(8);
    }

    let n = pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, page) in pages.iter().enumerate() {
        let mut content = Content::new();

        for placed in &page.blocks {
            let layout = layout_block(&placed.block, content_w);
            draw_block(&mut content, &layout, (left, content_top - placed.top));
        }

        if let Some(overlay) = page.overlay() {
            draw_overlay(&mut content, overlay, page_h, LOGO_NAME);
        }

        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);
    }
    let t_pages = t0.elapsed();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, page_w, page_h))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut font_dict = resources.fonts();
            for (name, font_ref) in &fonts {
                font_dict.pair(Name(name.as_bytes()), *font_ref);
            }
        }
        resources
            .x_objects()
            .pair(Name(LOGO_NAME.as_bytes()), logo_ref);
    }

    pdf.document_info(info_id)
        .title(TextStr(title))
        .creator(TextStr(concat!("quotation-pdf ", env!("CARGO_PKG_VERSION"))));

    let bytes = pdf.finish();

    log::info!(
        "Serialize phases: logo={:.1}ms, pages={:.1}ms, assembly={:.1}ms ({} pages, {} bytes)",
        t_logo.as_secs_f64() * 1000.0,
        (t_pages - t_logo).as_secs_f64() * 1000.0,
        (t0.elapsed() - t_pages).as_secs_f64() * 1000.0,
        n,
        bytes.len(),
    );

    Ok(ExportedFile {
        filename: options.filename.clone(),
        bytes,
    })
}

/// Write `bytes` next to `path` and rename into place, so a failed write never
/// leaves a truncated PDF under the final name.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut part = PathBuf::from(path);
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "quotation.pdf".into());
    name.push(".part");
    part.set_file_name(name);

    if let Err(e) = std::fs::write(&part, bytes) {
        std::fs::remove_file(&part).ok();
        return Err(Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", e, part.display()),
        )));
    }
    std::fs::rename(&part, path).map_err(|e| {
        std::fs::remove_file(&part).ok();
        Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
    })
}
