use std::time::Instant;

use crate::body::{ContinuousDocument, render_body};
use crate::config::ExportOptions;
use crate::error::Result;
use crate::layout::TextMeasure;
use crate::model::{FinancialTotals, QuotationRecord};
use crate::overlay::{BrandAssets, decorate};
use crate::paginate::{Page, paginate};
use crate::pdf::{ExportedFile, serialize};
use crate::source::{Credential, QuotationSource};
use crate::totals::compute_totals;

/// Result of an export run that did not fail.
#[derive(Debug)]
pub enum ExportOutcome {
    Exported(ExportedFile),
    /// The record has no line items; nothing was rendered.
    Empty,
}

/// One loaded quotation and its derived totals. Exports are run on demand
/// with [`DocumentSession::export`]; each run owns its own pages.
#[derive(Clone, Debug)]
pub struct DocumentSession {
    record: QuotationRecord,
    totals: FinancialTotals,
}

impl DocumentSession {
    /// Fetch and validate a record. Fetch failures, `Unauthorized` included,
    /// abort here before any total is computed.
    pub fn load<S>(source: &S, id: &str, credential: &Credential) -> Result<Self>
    where
        S: QuotationSource + ?Sized,
    {
        let record = source.fetch(id, credential)?;
        Self::from_record(record)
    }

    pub fn from_record(record: QuotationRecord) -> Result<Self> {
        record.validate()?;
        let totals = compute_totals(&record.items);
        Ok(Self { record, totals })
    }

    pub fn record(&self) -> &QuotationRecord {
        &self.record
    }

    pub fn totals(&self) -> &FinancialTotals {
        &self.totals
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    pub fn render(&self, options: &ExportOptions) -> ContinuousDocument {
        render_body(&self.record, &self.totals, &options.letter)
    }

    /// Render, paginate and decorate, without serializing.
    pub fn pages(&self, brand: &BrandAssets, options: &ExportOptions) -> Result<Vec<Page>> {
        let doc = self.render(options);
        let mut pages = paginate(doc, &options.page, &TextMeasure::new(&options.page));
        decorate(&mut pages, &options.page, brand, &options.overlay)?;
        Ok(pages)
    }

    /// Run render → paginate → decorate → serialize. Records without items
    /// short-circuit to [`ExportOutcome::Empty`] before rendering.
    pub fn export(&self, brand: &BrandAssets, options: &ExportOptions) -> Result<ExportOutcome> {
        if self.is_empty() {
            log::info!(
                "Quotation {:?} has no line items; nothing to export",
                self.record.quotation_number
            );
            return Ok(ExportOutcome::Empty);
        }
        options.validate()?;

        let t0 = Instant::now();
        let doc = self.render(options);
        let block_count = doc.len();
        let t_render = t0.elapsed();

        let mut pages = paginate(doc, &options.page, &TextMeasure::new(&options.page));
        let t_paginate = t0.elapsed();

        decorate(&mut pages, &options.page, brand, &options.overlay)?;
        let t_decorate = t0.elapsed();

        let title = format!("Quotation {}", self.record.quotation_number);
        let file = serialize(&pages, brand, options, &title)?;
        let t_total = t0.elapsed();

        log::info!(
            "Timing: render={:.1}ms, paginate={:.1}ms, decorate={:.1}ms, serialize={:.1}ms, total={:.1}ms ({} blocks, {} pages, {} bytes)",
            t_render.as_secs_f64() * 1000.0,
            (t_paginate - t_render).as_secs_f64() * 1000.0,
            (t_decorate - t_paginate).as_secs_f64() * 1000.0,
            (t_total - t_decorate).as_secs_f64() * 1000.0,
            t_total.as_secs_f64() * 1000.0,
            block_count,
            pages.len(),
            file.bytes.len(),
        );

        Ok(ExportOutcome::Exported(file))
    }
}
