mod body;
mod config;
mod error;
mod fonts;
mod layout;
mod model;
mod overlay;
mod paginate;
mod pdf;
mod session;
mod source;
mod totals;
mod words;

pub use body::{
    Alignment, Block, CellLine, ContinuousDocument, Paragraph, RowKind, TableCell, TableRow,
    item_row, render_body,
};
pub use config::{DEFAULT_COMPANY_FOOTER, DEFAULT_FILENAME, ExportOptions, LOGO_ENV, LetterConfig};
pub use error::{Error, ExportError, FetchError, RenderError, Result};
pub use fonts::Font;
pub use layout::{BlockLayout, TextMeasure, layout_block, wrap_text};
pub use model::{
    BackOrderEntry, ComponentGroup, FinancialTotals, LineItem, MaterialRef, QuotationRecord,
};
pub use overlay::{
    BrandAssets, FooterStamp, HeaderStamp, Overlay, OverlayStyle, decorate, page_label,
};
pub use paginate::{Measure, Page, PageSpec, PlacedBlock, mm_to_pts, paginate};
pub use pdf::{ExportedFile, serialize, write_atomically};
pub use session::{DocumentSession, ExportOutcome};
pub use source::{Credential, JsonDirSource, MemorySource, QuotationSource, read_record_file};
pub use totals::{TAX_RATE, compute_totals, format_amount, round2};
pub use words::{amount_in_words, number_in_words};

use std::path::Path;
use std::time::Instant;

/// Fetch, validate and export one quotation in a single call.
pub fn export_quotation<S>(
    source: &S,
    id: &str,
    credential: &Credential,
    brand: &BrandAssets,
    options: &ExportOptions,
) -> Result<ExportOutcome>
where
    S: QuotationSource + ?Sized,
{
    let t0 = Instant::now();
    let session = DocumentSession::load(source, id, credential)?;
    log::debug!(
        "Loaded quotation {id} in {:.1}ms ({} items)",
        t0.elapsed().as_secs_f64() * 1000.0,
        session.record().items.len()
    );
    session.export(brand, options)
}

/// Export a record stored as a JSON file and write the PDF to `output`.
///
/// Returns `Ok(false)` and leaves `output` untouched when the record has no
/// line items.
pub fn export_record_file(
    input: &Path,
    output: &Path,
    brand: &BrandAssets,
    options: &ExportOptions,
) -> Result<bool> {
    let t0 = Instant::now();

    let session = DocumentSession::from_record(read_record_file(input)?)?;
    let t_load = t0.elapsed();

    let file = match session.export(brand, options)? {
        ExportOutcome::Exported(file) => file,
        ExportOutcome::Empty => return Ok(false),
    };
    let t_export = t0.elapsed();

    write_atomically(output, &file.bytes)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: load={:.1}ms, export={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_load.as_secs_f64() * 1000.0,
        (t_export - t_load).as_secs_f64() * 1000.0,
        (t_total - t_export).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        file.bytes.len(),
    );

    Ok(true)
}
